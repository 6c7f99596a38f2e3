use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TranscriptService, calc};
use crate::models::{ApiResponse, ErrorCode, transcripts::responses::TranscriptResponse};
use crate::services::{current_user, ensure_self_or_staff};

pub async fn get_transcript(
    service: &TranscriptService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(response) = ensure_self_or_staff(&user, user_id) {
        return Ok(response);
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to build transcript",
            ));
        }
    }

    let completed = match storage.list_completed_enrollments(user_id).await {
        Ok(completed) => completed,
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to build transcript",
            ));
        }
    };

    let entries = calc::build_entries(&completed);
    let gpa = calc::gpa(&entries);
    let ncaa = calc::ncaa_eligibility(gpa, &entries);
    let total_credits: f64 = entries.iter().map(|e| e.credits).sum();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TranscriptResponse {
            user_id,
            entries,
            total_credits,
            gpa,
            ncaa,
        },
        "Transcript retrieved successfully",
    )))
}
