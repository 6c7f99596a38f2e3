use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::entities::Assignment,
    courses::{entities::EnrollmentStatus, responses::CompleteEnrollmentResponse},
    grades::entities::{Grade, LetterGrade},
    notifications::{entities::NotificationType, requests::NewNotification},
};

/// 每份作业只保留最近一次评分，重复提交不重复计入
pub fn latest_per_assignment(graded: &[(Grade, Assignment)]) -> Vec<&(Grade, Assignment)> {
    let mut latest: BTreeMap<i64, &(Grade, Assignment)> = BTreeMap::new();
    for row in graded {
        let (grade, assignment) = row;
        let newer = latest.get(&assignment.id).is_none_or(|(kept, _)| {
            (grade.graded_at, grade.id) > (kept.graded_at, kept.id)
        });
        if newer {
            latest.insert(assignment.id, row);
        }
    }
    latest.into_values().collect()
}

/// 课程最终百分比：已评分作业的得分总和 / 满分总和
pub fn final_percentage(graded: &[&(Grade, Assignment)]) -> Option<f64> {
    let (earned, possible) = graded
        .iter()
        .fold((0.0, 0.0), |(earned, possible), (grade, assignment)| {
            (earned + grade.points_earned, possible + assignment.points_total)
        });

    (possible > 0.0).then(|| earned / possible * 100.0)
}

pub async fn complete_enrollment(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let enrollment = match storage.get_enrollment(course_id, user_id).await {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "Student is not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to complete enrollment",
            ));
        }
    };

    if enrollment.status == EnrollmentStatus::Dropped {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NotEnrolled,
            "Enrollment was dropped",
        )));
    }

    let graded = match storage.list_course_grades_for_student(course_id, user_id).await {
        Ok(graded) => graded,
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to complete enrollment",
            ));
        }
    };

    let graded = latest_per_assignment(&graded);
    let percentage = final_percentage(&graded);
    let letter = percentage.map(LetterGrade::from_percentage);

    let enrollment = match storage
        .complete_enrollment(enrollment.id, percentage, letter)
        .await
    {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "Enrollment not found",
            )));
        }
        Err(e) => {
            return Ok(ApiResponse::from_error(
                &e,
                ErrorCode::InternalServerError,
                "Failed to complete enrollment",
            ));
        }
    };

    let summary = match letter {
        Some(letter) => format!("Final grade: {letter}"),
        None => "No graded assignments".to_string(),
    };
    let notification = NewNotification {
        user_id,
        notification_type: NotificationType::CourseCompleted,
        title: "Course completed".to_string(),
        content: Some(summary),
        reference_type: Some("course".to_string()),
        reference_id: Some(course_id),
    };
    if let Err(e) = storage.create_notification(notification).await {
        tracing::warn!("Failed to notify user {} of course completion: {}", user_id, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CompleteEnrollmentResponse {
            enrollment,
            graded_assignments: graded.len() as i64,
        },
        "Enrollment completed",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn graded(
        assignment_id: i64,
        grade_id: i64,
        points_earned: f64,
        points_total: f64,
    ) -> (Grade, Assignment) {
        let now = Utc::now();
        let grade = Grade {
            id: grade_id,
            submission_id: grade_id,
            student_id: 1,
            assignment_id,
            points_earned,
            percentage: points_earned / points_total * 100.0,
            letter_grade: LetterGrade::from_percentage(points_earned / points_total * 100.0),
            feedback: None,
            graded_by: 2,
            graded_at: now,
        };
        let assignment = Assignment {
            id: assignment_id,
            course_id: 1,
            title: "Quiz".to_string(),
            description: None,
            points_total,
            due_date: None,
            allow_late_submission: false,
            late_deduction: 0.0,
            is_published: true,
            created_by: 2,
            created_at: now,
            updated_at: now,
        };
        (grade, assignment)
    }

    #[test]
    fn test_final_percentage_is_points_weighted() {
        // 10/10 + 40/90 = 50/100
        let rows = vec![graded(1, 1, 10.0, 10.0), graded(2, 2, 40.0, 90.0)];
        let pct = final_percentage(&latest_per_assignment(&rows)).unwrap();
        assert!((pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_resubmission_counts_once() {
        // 同一份作业评了两次，只计最近一次
        let mut first = graded(1, 1, 100.0, 100.0);
        first.0.graded_at -= Duration::hours(1);
        let rows = vec![
            first,
            graded(1, 3, 80.0, 100.0),
            graded(2, 2, 0.0, 100.0),
        ];

        let latest = latest_per_assignment(&rows);
        assert_eq!(latest.len(), 2);
        let pct = final_percentage(&latest).unwrap();
        assert!((pct - 40.0).abs() < 1e-9);

        // 评分时间相同时按评分 ID 取后者
        let higher_id = graded(1, 5, 100.0, 100.0);
        let mut lower_id = graded(1, 4, 20.0, 100.0);
        lower_id.0.graded_at = higher_id.0.graded_at;
        let rows = vec![higher_id, lower_id];
        let pct = final_percentage(&latest_per_assignment(&rows)).unwrap();
        assert!((pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_final_percentage_without_grades() {
        assert_eq!(final_percentage(&[]), None);
    }
}
