use crate::models::common::pagination::{PaginationQuery, deserialize_option_i64};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubmissionStatus;

/// 创建提交请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub content: String,
}

/// 用户提交列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct UserSubmissionParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub assignment_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

/// 存储层创建提交参数
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub is_late: bool,
}
