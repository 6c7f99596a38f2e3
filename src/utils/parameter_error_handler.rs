//! 请求体与查询串解析失败时返回统一的 `ApiResponse`

use actix_web::{HttpRequest, HttpResponse, error, web};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    tracing::debug!("JSON 解析失败 {}: {}", req.path(), err);
    let message = match &err {
        error::JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        error::JsonPayloadError::OverflowKnownLength { .. }
        | error::JsonPayloadError::Overflow { .. } => "Request body is too large".to_string(),
        other => format!("Invalid JSON body: {other}"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    tracing::debug!("查询参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid query parameters: {err}"),
    ));
    error::InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: error::PathError, req: &HttpRequest) -> error::Error {
    tracing::debug!("路径参数解析失败 {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid path parameter: {err}"),
    ));
    error::InternalError::from_response(err, response).into()
}

/// 注册到 `App` 的提取器配置
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(json_error_handler)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}
