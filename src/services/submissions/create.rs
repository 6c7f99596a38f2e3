use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::SubmissionWindow,
    courses::entities::EnrollmentStatus,
    submissions::requests::{CreateSubmissionRequest, NewSubmission},
};
use crate::services::current_user;

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    if req.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission content is required",
        )));
    }

    // 未发布的作业对学员不可见，按不存在处理
    let assignment = match storage.get_assignment_by_id(req.assignment_id).await {
        Ok(Some(assignment)) if assignment.is_published => assignment,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to create submission",
            ));
        }
    };

    match storage.get_enrollment(assignment.course_id, user.id).await {
        Ok(Some(enrollment)) if enrollment.status != EnrollmentStatus::Dropped => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to create submission",
            ));
        }
    }

    let is_late = match assignment.submission_window(Utc::now()) {
        SubmissionWindow::OnTime => false,
        SubmissionWindow::Late => true,
        SubmissionWindow::Closed => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::AssignmentClosed,
                "Assignment is past due and does not accept late submissions",
            )));
        }
    };

    let new_submission = NewSubmission {
        assignment_id: assignment.id,
        student_id: user.id,
        content: req.content,
        is_late,
    };

    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            tracing::debug!(
                "User {} submitted assignment {} (late: {})",
                user.id,
                assignment.id,
                is_late
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "Submission created")))
        }
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to create submission",
        )),
    }
}
