use serde::Serialize;
use ts_rs::TS;

use crate::models::grades::entities::LetterGrade;

/// 成绩单中的一门已结课程
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct TranscriptEntry {
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub credits: f64,
    pub is_core: bool,
    pub final_percentage: Option<f64>,
    pub letter_grade: Option<LetterGrade>,
    pub grade_points: f64,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// NCAA Division I 资格判定
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct NcaaEligibility {
    pub eligible: bool,
    pub gpa: f64,
    pub min_gpa: f64,
    pub core_courses_completed: i64,
    pub core_courses_required: i64,
    pub reason: Option<String>,
}
