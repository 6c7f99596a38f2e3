use crate::models::common::pagination::{PaginationQuery, deserialize_option_bool};
use serde::Deserialize;
use ts_rs::TS;

/// 课程列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<String>,
    pub grade_level: Option<String>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_bool")]
    pub active_only: Option<bool>,
}

/// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub credits: Option<f64>,
    pub grade_level: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub is_core: bool,
}

/// 存储层创建课程参数
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub credits: f64,
    pub grade_level: Option<String>,
    pub department: Option<String>,
    pub is_core: bool,
    pub instructor_id: i64,
}
