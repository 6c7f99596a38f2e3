use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub points_total: f64,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601，如 "2026-11-02T23:59:00Z"
    #[serde(default)]
    pub allow_late_submission: bool,
    #[serde(default)]
    pub late_deduction: f64,
    #[serde(default)]
    pub is_published: bool,
}

/// 存储层创建作业参数
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points_total: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub allow_late_submission: bool,
    pub late_deduction: f64,
    pub is_published: bool,
    pub created_by: i64,
}
