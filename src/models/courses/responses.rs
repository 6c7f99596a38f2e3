use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, Enrollment};
use crate::models::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

/// 结课结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CompleteEnrollmentResponse {
    pub enrollment: Enrollment,
    pub graded_assignments: i64,
}
