//! 评分存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginationInfo,
    assignments::entities::Assignment,
    grades::{
        entities::Grade,
        requests::{NewGrade, UserGradeParams},
        responses::GradeListResponse,
    },
    submissions::entities::SubmissionStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建评分并将提交标记为已评分（同一事务）
    pub async fn create_grade_impl(&self, req: NewGrade) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let submission_id = req.submission_id;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let model = ActiveModel {
            submission_id: Set(req.submission_id),
            student_id: Set(req.student_id),
            assignment_id: Set(req.assignment_id),
            points_earned: Set(req.points_earned),
            percentage: Set(req.percentage),
            letter_grade: Set(req.letter_grade.to_string()),
            feedback: Set(req.feedback),
            graded_by: Set(req.graded_by),
            graded_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AcademyError::conflict(format!("提交 {submission_id} 已评分"))
            }
            _ => AcademyError::database_operation(format!("创建评分失败: {e}")),
        })?;

        Submissions::update_many()
            .col_expr(
                SubmissionColumn::Status,
                sea_orm::sea_query::Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .filter(SubmissionColumn::Id.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新提交状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_grade())
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 课程下的作业 ID
    async fn course_assignment_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        Assignments::find()
            .filter(AssignmentColumn::CourseId.eq(course_id))
            .select_only()
            .column(AssignmentColumn::Id)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程作业失败: {e}")))
    }

    /// 分页列出用户的评分
    pub async fn list_grades_by_user_impl(
        &self,
        user_id: i64,
        params: UserGradeParams,
    ) -> Result<GradeListResponse> {
        let (page, size) = params.pagination.normalized();

        let mut select = Grades::find().filter(Column::StudentId.eq(user_id));

        if let Some(course_id) = params.course_id {
            let assignment_ids = self.course_assignment_ids(course_id).await?;
            select = select.filter(Column::AssignmentId.is_in(assignment_ids));
        }

        select = select.order_by_desc(Column::GradedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询评分总数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询评分列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: grades.into_iter().map(|m| m.into_grade()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 学生在课程中的评分及对应作业
    pub async fn list_course_grades_for_student_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Vec<(Grade, Assignment)>> {
        let assignments: HashMap<i64, Assignment> = Assignments::find()
            .filter(AssignmentColumn::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程作业失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_assignment()))
            .collect();

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let grades = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AssignmentId.is_in(assignments.keys().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程评分失败: {e}")))?;

        Ok(grades
            .into_iter()
            .filter_map(|g| {
                let assignment = assignments.get(&g.assignment_id)?.clone();
                Some((g.into_grade(), assignment))
            })
            .collect())
    }
}
