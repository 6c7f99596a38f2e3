use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::{CreateCourseRequest, NewCourse},
};
use crate::services::current_user;
use crate::utils::validate::{validate_course_code, validate_credits};

const DEFAULT_CREDITS: f64 = 1.0;

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message))
}

/// 校验并规范化请求，代码统一转为大写
fn normalize(course: CreateCourseRequest, instructor_id: i64) -> Result<NewCourse, HttpResponse> {
    let title = course.title.trim().to_string();
    if title.is_empty() {
        return Err(bad_request("Course title is required"));
    }

    let code = course.code.trim().to_ascii_uppercase();
    validate_course_code(&code).map_err(bad_request)?;

    let credits = course.credits.unwrap_or(DEFAULT_CREDITS);
    validate_credits(credits).map_err(bad_request)?;

    Ok(NewCourse {
        title,
        description: course.description,
        code,
        credits,
        grade_level: course.grade_level,
        department: course.department,
        is_core: course.is_core,
        instructor_id,
    })
}

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    course: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let new_course = match normalize(course, user.id) {
        Ok(course) => course,
        Err(response) => return Ok(response),
    };

    match storage.get_course_by_code(&new_course.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseCodeAlreadyExists,
                format!("Course code {} already exists", new_course.code),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to create course",
            ));
        }
    }

    match storage.create_course(new_course).await {
        Ok(course) => {
            tracing::info!("Course {} created by user {}", course.code, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to create course",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, credits: Option<f64>) -> CreateCourseRequest {
        CreateCourseRequest {
            title: " Sports Nutrition ".to_string(),
            description: None,
            code: code.to_string(),
            credits,
            grade_level: Some("11".to_string()),
            department: Some("Health".to_string()),
            is_core: false,
        }
    }

    #[test]
    fn test_normalize_defaults_and_uppercases() {
        let course = normalize(request(" hlth-210 ", None), 3).unwrap();
        assert_eq!(course.code, "HLTH-210");
        assert_eq!(course.title, "Sports Nutrition");
        assert_eq!(course.credits, DEFAULT_CREDITS);
        assert_eq!(course.instructor_id, 3);
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize(request("HLTH 210", None), 1).is_err());
        assert!(normalize(request("HLTH-210", Some(0.0)), 1).is_err());
        assert!(normalize(request("HLTH-210", Some(12.0)), 1).is_err());

        let mut untitled = request("HLTH-210", None);
        untitled.title = "   ".to_string();
        assert!(normalize(untitled, 1).is_err());
    }
}
