use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::AcademyError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// 将存储/业务错误转换为带状态码的 JSON 响应
    pub fn from_error(
        err: &AcademyError,
        code: ErrorCode,
        context: &str,
    ) -> actix_web::HttpResponse {
        // 5xx 只返回上下文，具体原因写入日志
        let message = if err.status_code().is_server_error() {
            tracing::error!("{}: {}", context, err);
            context.to_string()
        } else {
            tracing::debug!("{}: {}", context, err);
            format!("{context}: {}", err.message())
        };
        actix_web::HttpResponse::build(err.status_code())
            .json(ApiResponse::error_empty(code, message))
    }
}
