use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::{ApiResponse, ErrorCode, grades::requests::UserGradeParams};
use crate::services::{current_user, ensure_self_or_staff};

pub async fn list_user_grades(
    service: &GradeService,
    request: &HttpRequest,
    user_id: i64,
    params: UserGradeParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    if let Err(response) = ensure_self_or_staff(&user, user_id) {
        return Ok(response);
    }

    let storage = service.get_storage(request)?;

    match storage.list_grades_by_user(user_id, params).await {
        Ok(response) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(response, "Grades retrieved successfully"))),
        Err(e) => Ok(ApiResponse::from_error(
            &e,
            ErrorCode::InternalServerError,
            "Failed to list grades",
        )),
    }
}
