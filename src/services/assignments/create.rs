use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::{CreateAssignmentRequest, NewAssignment},
};
use crate::services::current_user;
use crate::utils::validate::{validate_late_deduction, validate_points_total};

fn validate(req: &CreateAssignmentRequest) -> Result<(), &'static str> {
    if req.title.trim().is_empty() {
        return Err("Assignment title is required");
    }
    validate_points_total(req.points_total)?;
    validate_late_deduction(req.late_deduction)?;
    Ok(())
}

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    course_id: i64,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    if let Err(msg) = validate(&req) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to create assignment",
            ));
        }
    }

    let new_assignment = NewAssignment {
        course_id,
        title: req.title.trim().to_string(),
        description: req.description,
        points_total: req.points_total,
        due_date: req.due_date,
        allow_late_submission: req.allow_late_submission,
        late_deduction: req.late_deduction,
        is_published: req.is_published,
        created_by: user.id,
    };

    match storage.create_assignment(new_assignment).await {
        Ok(assignment) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(assignment, "Assignment created"))),
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to create assignment",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(points_total: f64, late_deduction: f64) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: "Combine prep log".to_string(),
            description: None,
            points_total,
            due_date: None,
            allow_late_submission: true,
            late_deduction,
            is_published: true,
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&req(100.0, 10.0)).is_ok());
        assert!(validate(&req(0.0, 10.0)).is_err());
        assert!(validate(&req(100.0, 101.0)).is_err());

        let mut untitled = req(100.0, 0.0);
        untitled.title = " ".to_string();
        assert!(validate(&untitled).is_err());
    }
}
