use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::AcademyError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn enroll(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
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
                "Failed to enroll",
            ));
        }
    };

    if !course.is_active {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInactive,
            "Course is not open for enrollment",
        )));
    }

    match storage.get_enrollment(course_id, user.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Already enrolled in this course",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to enroll",
            ));
        }
    }

    match storage.create_enrollment(course_id, user.id).await {
        Ok(enrollment) => {
            tracing::info!("User {} enrolled in course {}", user.id, course.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Enrolled")))
        }
        // 并发重复选课由唯一索引兜底
        Err(e @ AcademyError::Conflict(_)) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::AlreadyEnrolled,
            "Failed to enroll",
        )),
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to enroll",
        )),
    }
}
