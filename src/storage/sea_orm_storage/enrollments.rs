//! 选课存储操作

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{AcademyError, Result};
use crate::models::{
    courses::entities::{Course, Enrollment, EnrollmentStatus},
    grades::entities::LetterGrade,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 创建选课记录
    pub async fn create_enrollment_impl(&self, course_id: i64, user_id: i64) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            status: Set(EnrollmentStatus::Active.to_string()),
            final_percentage: Set(None),
            letter_grade: Set(None),
            enrolled_at: Set(now),
            completed_at: Set(None),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AcademyError::conflict(format!("用户 {user_id} 已选修课程 {course_id}"))
            }
            _ => AcademyError::database_operation(format!("创建选课记录失败: {e}")),
        })?;

        Ok(result.into_enrollment())
    }

    /// 获取用户在课程中的选课记录
    pub async fn get_enrollment_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 结课
    pub async fn complete_enrollment_impl(
        &self,
        enrollment_id: i64,
        final_percentage: Option<f64>,
        letter_grade: Option<LetterGrade>,
    ) -> Result<Option<Enrollment>> {
        let existing = Enrollments::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询选课记录失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            id: Set(enrollment_id),
            status: Set(EnrollmentStatus::Completed.to_string()),
            final_percentage: Set(final_percentage),
            letter_grade: Set(letter_grade.map(|g| g.to_string())),
            completed_at: Set(Some(now)),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新选课记录失败: {e}")))?;

        Ok(Some(result.into_enrollment()))
    }

    /// 用户已结课的选课记录及课程
    pub async fn list_completed_enrollments_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Enrollment, Course)>> {
        let rows = Enrollments::find()
            .find_also_related(Courses)
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(EnrollmentStatus::Completed.to_string()))
            .order_by_asc(Column::CompletedAt)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成绩单失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                course.map(|c| (enrollment.into_enrollment(), c.into_course()))
            })
            .collect())
    }
}
