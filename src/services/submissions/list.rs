use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, submissions::requests::UserSubmissionParams};
use crate::services::{current_user, ensure_self_or_staff};

pub async fn list_user_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    user_id: i64,
    params: UserSubmissionParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(response) = ensure_self_or_staff(&user, user_id) {
        return Ok(response);
    }

    let storage = service.get_storage(request)?;

    match storage.list_submissions_by_user(user_id, params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to list submissions",
        )),
    }
}
