use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::errors::AcademyError;
use crate::models::{
    ApiResponse, ErrorCode,
    grades::{
        entities::score_submission,
        requests::{GradeSubmissionRequest, NewGrade},
    },
    notifications::{entities::NotificationType, requests::NewNotification},
};
use crate::services::current_user;

pub async fn grade_submission(
    service: &GradeService,
    request: &HttpRequest,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let grader = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to grade submission",
            ));
        }
    };

    match storage.get_grade_by_submission_id(submission_id).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::GradeAlreadyExists,
                "Submission has already been graded",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to grade submission",
            ));
        }
    }

    let assignment = match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to grade submission",
            ));
        }
    };

    let score = match score_submission(
        req.points_earned,
        assignment.points_total,
        submission.is_late,
        assignment.late_deduction,
    ) {
        Ok(score) => score,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::GradeInvalidScore, msg)));
        }
    };

    let new_grade = NewGrade {
        submission_id,
        student_id: submission.student_id,
        assignment_id: assignment.id,
        points_earned: score.points_earned,
        percentage: score.percentage,
        letter_grade: score.letter_grade,
        feedback: req.feedback,
        graded_by: grader.id,
    };

    let grade = match storage.create_grade(new_grade).await {
        Ok(grade) => grade,
        // 并发重复评分由唯一约束兜底
        Err(e @ AcademyError::Conflict(_)) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::GradeAlreadyExists,
                "Failed to grade submission",
            ));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to grade submission",
            ));
        }
    };

    let notification = NewNotification {
        user_id: submission.student_id,
        notification_type: NotificationType::GradePosted,
        title: format!("Grade posted: {}", assignment.title),
        content: Some(format!(
            "You scored {:.1}/{} ({})",
            grade.points_earned, assignment.points_total, grade.letter_grade
        )),
        reference_type: Some("submission".to_string()),
        reference_id: Some(submission_id),
    };
    if let Err(e) = storage.create_notification(notification).await {
        tracing::warn!(
            "Failed to notify user {} of grade {}: {}",
            submission.student_id,
            grade.id,
            e
        );
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(grade, "Submission graded")))
}
