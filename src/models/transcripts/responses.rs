use serde::Serialize;
use ts_rs::TS;

use super::entities::{NcaaEligibility, TranscriptEntry};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct TranscriptResponse {
    pub user_id: i64,
    pub entries: Vec<TranscriptEntry>,
    pub total_credits: f64,
    pub gpa: f64,
    pub ncaa: NcaaEligibility,
}
