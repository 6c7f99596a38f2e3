use crate::models::common::pagination::{PaginationQuery, deserialize_option_i64};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::LetterGrade;

/// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeSubmissionRequest {
    pub points_earned: f64,
    pub feedback: Option<String>,
}

/// 用户成绩列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UserGradeParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub course_id: Option<i64>,
}

/// 存储层创建评分参数
#[derive(Debug, Clone)]
pub struct NewGrade {
    pub submission_id: i64,
    pub student_id: i64,
    pub assignment_id: i64,
    pub points_earned: f64,
    pub percentage: f64,
    pub letter_grade: LetterGrade,
    pub feedback: Option<String>,
    pub graded_by: i64,
}
