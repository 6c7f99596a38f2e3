use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::NewAssignment},
    courses::{
        entities::{Course, Enrollment},
        requests::{CourseListParams, NewCourse},
        responses::CourseListResponse,
    },
    grades::{
        entities::{Grade, LetterGrade},
        requests::{NewGrade, UserGradeParams},
        responses::GradeListResponse,
    },
    notifications::{
        entities::Notification,
        requests::{NewNotification, NotificationListParams},
        responses::NotificationListResponse,
    },
    offers::entities::{OfferEventKind, OfferEventTally},
    submissions::{
        entities::Submission,
        requests::{NewSubmission, UserSubmissionParams},
        responses::SubmissionListResponse,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程与选课
    async fn create_course(&self, course: NewCourse) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // listCourses
    async fn list_courses_with_pagination(
        &self,
        params: CourseListParams,
    ) -> Result<CourseListResponse>;
    async fn create_enrollment(&self, course_id: i64, user_id: i64) -> Result<Enrollment>;
    async fn get_enrollment(&self, course_id: i64, user_id: i64) -> Result<Option<Enrollment>>;
    // 结课：写入最终百分比与等级
    async fn complete_enrollment(
        &self,
        enrollment_id: i64,
        final_percentage: Option<f64>,
        letter_grade: Option<LetterGrade>,
    ) -> Result<Option<Enrollment>>;
    // 用户已结课程（成绩单）
    async fn list_completed_enrollments(&self, user_id: i64)
    -> Result<Vec<(Enrollment, Course)>>;

    /// 作业
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_by_course(
        &self,
        course_id: i64,
        published_only: bool,
    ) -> Result<Vec<Assignment>>;

    /// 提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // getSubmissionsByUser
    async fn list_submissions_by_user(
        &self,
        user_id: i64,
        params: UserSubmissionParams,
    ) -> Result<SubmissionListResponse>;

    /// 评分
    // 创建评分并将提交标记为已评分
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade>;
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;
    // getGradesByUser
    async fn list_grades_by_user(
        &self,
        user_id: i64,
        params: UserGradeParams,
    ) -> Result<GradeListResponse>;
    // 学生在课程内的全部评分及对应作业
    async fn list_course_grades_for_student(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Vec<(Grade, Assignment)>>;

    /// 通知
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        params: NotificationListParams,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64>;
    // 仅当通知属于该用户时生效
    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;

    /// 推广方案事件
    async fn record_offer_event(
        &self,
        experiment: &str,
        variant: &str,
        kind: OfferEventKind,
        user_id: Option<i64>,
    ) -> Result<()>;
    async fn aggregate_offer_events(&self) -> Result<Vec<OfferEventTally>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
