use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points_total: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub allow_late_submission: bool,
    /// 迟交扣分百分比 [0, 100]
    pub late_deduction: f64,
    pub is_published: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 在 `now` 时刻提交的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionWindow {
    OnTime,
    Late,
    Closed,
}

impl Assignment {
    pub fn submission_window(&self, now: DateTime<Utc>) -> SubmissionWindow {
        match self.due_date {
            Some(due) if now > due => {
                if self.allow_late_submission {
                    SubmissionWindow::Late
                } else {
                    SubmissionWindow::Closed
                }
            }
            _ => SubmissionWindow::OnTime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(due: Option<DateTime<Utc>>, allow_late: bool) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            course_id: 1,
            title: "Film study".to_string(),
            description: None,
            points_total: 100.0,
            due_date: due,
            allow_late_submission: allow_late,
            late_deduction: 10.0,
            is_published: true,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_submission_window() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));

        assert_eq!(assignment(None, false).submission_window(now), SubmissionWindow::OnTime);
        assert_eq!(assignment(future, false).submission_window(now), SubmissionWindow::OnTime);
        assert_eq!(assignment(past, false).submission_window(now), SubmissionWindow::Closed);
        assert_eq!(assignment(past, true).submission_window(now), SubmissionWindow::Late);
    }
}
