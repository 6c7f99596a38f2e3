//! 绩点与 NCAA Division I 资格计算

use crate::models::{
    courses::entities::{Course, Enrollment},
    grades::entities::LetterGrade,
    transcripts::entities::{NcaaEligibility, TranscriptEntry},
};

pub const NCAA_MIN_GPA: f64 = 2.3;
pub const NCAA_CORE_COURSES_REQUIRED: i64 = 16;

/// 没有字母等级时按百分比粗略换算
fn percentage_points(percentage: f64) -> f64 {
    match percentage {
        p if p >= 90.0 => 4.0,
        p if p >= 80.0 => 3.0,
        p if p >= 70.0 => 2.0,
        p if p >= 60.0 => 1.0,
        _ => 0.0,
    }
}

pub fn grade_points(letter: Option<LetterGrade>, percentage: Option<f64>) -> f64 {
    match (letter, percentage) {
        (Some(letter), _) => letter.grade_points(),
        (None, Some(percentage)) => percentage_points(percentage),
        (None, None) => 0.0,
    }
}

fn effective_credits(credits: f64) -> f64 {
    if credits.is_finite() && credits > 0.0 {
        credits
    } else {
        1.0
    }
}

pub fn build_entries(completed: &[(Enrollment, Course)]) -> Vec<TranscriptEntry> {
    completed
        .iter()
        .map(|(enrollment, course)| TranscriptEntry {
            course_id: course.id,
            course_code: course.code.clone(),
            course_title: course.title.clone(),
            credits: effective_credits(course.credits),
            is_core: course.is_core,
            final_percentage: enrollment.final_percentage,
            letter_grade: enrollment.letter_grade,
            grade_points: grade_points(enrollment.letter_grade, enrollment.final_percentage),
            completed_at: enrollment.completed_at,
        })
        .collect()
}

/// Σ(绩点 × 学分) / Σ学分，保留两位小数；无课程时为 0
pub fn gpa(entries: &[TranscriptEntry]) -> f64 {
    let (quality, credits) = entries.iter().fold((0.0, 0.0), |(quality, credits), entry| {
        (quality + entry.grade_points * entry.credits, credits + entry.credits)
    });
    if credits > 0.0 {
        (quality / credits * 100.0).round() / 100.0
    } else {
        0.0
    }
}

pub fn ncaa_eligibility(gpa: f64, entries: &[TranscriptEntry]) -> NcaaEligibility {
    let core_completed = entries.iter().filter(|e| e.is_core).count() as i64;
    let gpa_met = gpa >= NCAA_MIN_GPA;
    let core_met = core_completed >= NCAA_CORE_COURSES_REQUIRED;

    let reason = match (gpa_met, core_met) {
        (true, true) => None,
        (false, false) => Some(format!(
            "GPA below {NCAA_MIN_GPA} and only {core_completed}/{NCAA_CORE_COURSES_REQUIRED} core courses completed"
        )),
        (false, true) => Some(format!("GPA below required {NCAA_MIN_GPA}")),
        (true, false) => Some(format!(
            "Only {core_completed}/{NCAA_CORE_COURSES_REQUIRED} core courses completed"
        )),
    };

    NcaaEligibility {
        eligible: gpa_met && core_met,
        gpa,
        min_gpa: NCAA_MIN_GPA,
        core_courses_completed: core_completed,
        core_courses_required: NCAA_CORE_COURSES_REQUIRED,
        reason,
    }
}
