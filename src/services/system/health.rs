use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{ApiResponse, AppStartTime, ErrorCode, system::responses::HealthResponse};

/// 健康检查：存活状态、版本与运行时长
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(start) = request.app_data::<web::Data<AppStartTime>>() else {
        tracing::error!("AppStartTime not found in app data");
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Start time unavailable",
        )));
    };

    let uptime_seconds = chrono::Utc::now()
        .signed_duration_since(start.start_datetime)
        .num_seconds()
        .max(0);

    let response = HealthResponse {
        status: "ok".to_string(),
        system_name: service.get_config().app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        started_at: start.start_datetime,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
}
