//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod enrollments;
mod grades;
mod notifications;
mod offer_events;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;
        let pool_size = config.database.pool_size;
        let timeout = Duration::from_secs(config.database.timeout);

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 包装已有连接并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout: Duration,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademyError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout: Duration,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademyError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 单连接内存库，测试专用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, Duration::from_secs(5)).await?;
        Self::from_connection(db).await
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: NewCourse) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        params: CourseListParams,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(params).await
    }

    // 选课模块
    async fn create_enrollment(&self, course_id: i64, user_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(course_id, user_id).await
    }

    async fn get_enrollment(&self, course_id: i64, user_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(course_id, user_id).await
    }

    async fn complete_enrollment(
        &self,
        enrollment_id: i64,
        final_percentage: Option<f64>,
        letter_grade: Option<LetterGrade>,
    ) -> Result<Option<Enrollment>> {
        self.complete_enrollment_impl(enrollment_id, final_percentage, letter_grade)
            .await
    }

    async fn list_completed_enrollments(
        &self,
        user_id: i64,
    ) -> Result<Vec<(Enrollment, Course)>> {
        self.list_completed_enrollments_impl(user_id).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_by_course(
        &self,
        course_id: i64,
        published_only: bool,
    ) -> Result<Vec<Assignment>> {
        self.list_assignments_by_course_impl(course_id, published_only)
            .await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_by_user(
        &self,
        user_id: i64,
        params: UserSubmissionParams,
    ) -> Result<SubmissionListResponse> {
        self.list_submissions_by_user_impl(user_id, params).await
    }

    // 评分模块
    async fn create_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.create_grade_impl(grade).await
    }

    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_id_impl(submission_id).await
    }

    async fn list_grades_by_user(
        &self,
        user_id: i64,
        params: UserGradeParams,
    ) -> Result<GradeListResponse> {
        self.list_grades_by_user_impl(user_id, params).await
    }

    async fn list_course_grades_for_student(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Vec<(Grade, Assignment)>> {
        self.list_course_grades_for_student_impl(course_id, student_id)
            .await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        params: NotificationListParams,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, params)
            .await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, notification_id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    // 推广方案事件
    async fn record_offer_event(
        &self,
        experiment: &str,
        variant: &str,
        kind: OfferEventKind,
        user_id: Option<i64>,
    ) -> Result<()> {
        self.record_offer_event_impl(experiment, variant, kind, user_id)
            .await
    }

    async fn aggregate_offer_events(&self) -> Result<Vec<OfferEventTally>> {
        self.aggregate_offer_events_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("academy.db").unwrap(),
            "sqlite://academy.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/academy").unwrap(),
            "postgres://u:p@localhost/academy"
        );
        assert!(SeaOrmStorage::build_database_url("academy").is_err());
    }

    mod db {
        use crate::errors::AcademyError;
        use crate::models::{
            PaginationQuery,
            assignments::requests::NewAssignment,
            courses::requests::{CourseListParams, NewCourse},
            courses::entities::EnrollmentStatus,
            grades::{
                entities::LetterGrade,
                requests::{NewGrade, UserGradeParams},
            },
            offers::entities::OfferEventKind,
            submissions::{entities::SubmissionStatus, requests::NewSubmission},
            users::{
                entities::{UserProfile, UserRole},
                requests::CreateUserRequest,
            },
        };
        use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

        fn page() -> PaginationQuery {
            PaginationQuery { page: 1, size: 20 }
        }

        async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
            storage
                .create_user(CreateUserRequest {
                    username: username.to_string(),
                    email: format!("{username}@academy.test"),
                    password_hash: "hash".to_string(),
                    role,
                    profile: UserProfile::default(),
                })
                .await
                .unwrap()
                .id
        }

        fn course(code: &str, title: &str, department: &str, instructor_id: i64) -> NewCourse {
            NewCourse {
                title: title.to_string(),
                description: None,
                code: code.to_string(),
                credits: 1.0,
                grade_level: Some("10".to_string()),
                department: Some(department.to_string()),
                is_core: true,
                instructor_id,
            }
        }

        #[tokio::test]
        async fn test_user_lookup_by_username_or_email() {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            let id = user(&storage, "athlete_01", UserRole::Student).await;

            let by_name = storage.get_user_by_username_or_email("athlete_01").await.unwrap();
            let by_email = storage
                .get_user_by_username_or_email("athlete_01@academy.test")
                .await
                .unwrap();
            assert_eq!(by_name.map(|u| u.id), Some(id));
            assert_eq!(by_email.map(|u| u.id), Some(id));
            assert_eq!(storage.count_users().await.unwrap(), 1);
            assert!(storage.update_last_login(id).await.unwrap());
        }

        #[tokio::test]
        async fn test_list_courses_filters_and_escapes_search() {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            let coach = user(&storage, "coach_01", UserRole::Instructor).await;
            storage.create_course(course("MATH-101", "Algebra", "math", coach)).await.unwrap();
            storage.create_course(course("MATH-102", "Geometry", "math", coach)).await.unwrap();
            storage.create_course(course("ENG-101", "English I", "english", coach)).await.unwrap();

            let math = storage
                .list_courses_with_pagination(CourseListParams {
                    pagination: page(),
                    department: Some("math".to_string()),
                    grade_level: None,
                    search: None,
                    active_only: None,
                })
                .await
                .unwrap();
            assert_eq!(math.pagination.total, 2);
            assert_eq!(math.items[0].code, "MATH-101");

            let search = |term: &str| CourseListParams {
                pagination: page(),
                department: None,
                grade_level: None,
                search: Some(term.to_string()),
                active_only: None,
            };
            let english = storage.list_courses_with_pagination(search("eng")).await.unwrap();
            assert_eq!(english.pagination.total, 1);
            assert_eq!(english.items[0].code, "ENG-101");

            // 通配符按字面处理，不会匹配 MATH-101
            let wildcard = storage.list_courses_with_pagination(search("MATH_10")).await.unwrap();
            assert_eq!(wildcard.pagination.total, 0);
        }

        #[tokio::test]
        async fn test_grading_marks_submission_and_rejects_regrade() {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            let coach = user(&storage, "coach_01", UserRole::Instructor).await;
            let student = user(&storage, "athlete_01", UserRole::Student).await;
            let course = storage
                .create_course(course("ENG-101", "English I", "english", coach))
                .await
                .unwrap();
            storage.create_enrollment(course.id, student).await.unwrap();
            let assignment = storage
                .create_assignment(NewAssignment {
                    course_id: course.id,
                    title: "Essay".to_string(),
                    description: None,
                    points_total: 100.0,
                    due_date: None,
                    allow_late_submission: false,
                    late_deduction: 0.0,
                    is_published: true,
                    created_by: coach,
                })
                .await
                .unwrap();
            let submission = storage
                .create_submission(NewSubmission {
                    assignment_id: assignment.id,
                    student_id: student,
                    content: "draft".to_string(),
                    is_late: false,
                })
                .await
                .unwrap();
            assert_eq!(submission.status, SubmissionStatus::Submitted);

            let new_grade = NewGrade {
                submission_id: submission.id,
                student_id: student,
                assignment_id: assignment.id,
                points_earned: 84.0,
                percentage: 84.0,
                letter_grade: LetterGrade::B,
                feedback: None,
                graded_by: coach,
            };
            let grade = storage.create_grade(new_grade.clone()).await.unwrap();
            assert_eq!(grade.letter_grade, LetterGrade::B);

            let graded = storage.get_submission_by_id(submission.id).await.unwrap().unwrap();
            assert_eq!(graded.status, SubmissionStatus::Graded);

            let err = storage.create_grade(new_grade).await.unwrap_err();
            assert!(matches!(err, AcademyError::Conflict(_)));

            let grades = storage
                .list_grades_by_user(
                    student,
                    UserGradeParams {
                        pagination: page(),
                        course_id: Some(course.id),
                    },
                )
                .await
                .unwrap();
            assert_eq!(grades.pagination.total, 1);

            let in_course = storage
                .list_course_grades_for_student(course.id, student)
                .await
                .unwrap();
            assert_eq!(in_course.len(), 1);
            assert_eq!(in_course[0].1.id, assignment.id);

            let enrollment = storage.get_enrollment(course.id, student).await.unwrap().unwrap();
            let completed = storage
                .complete_enrollment(enrollment.id, Some(84.0), Some(LetterGrade::B))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(completed.status, EnrollmentStatus::Completed);

            let transcript = storage.list_completed_enrollments(student).await.unwrap();
            assert_eq!(transcript.len(), 1);
            assert_eq!(transcript[0].1.code, "ENG-101");
        }

        #[tokio::test]
        async fn test_duplicate_enrollment_is_conflict() {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            let coach = user(&storage, "coach_01", UserRole::Instructor).await;
            let student = user(&storage, "athlete_01", UserRole::Student).await;
            let course = storage
                .create_course(course("ENG-101", "English I", "english", coach))
                .await
                .unwrap();

            storage.create_enrollment(course.id, student).await.unwrap();
            let err = storage.create_enrollment(course.id, student).await.unwrap_err();
            assert!(matches!(err, AcademyError::Conflict(_)));
        }

        #[tokio::test]
        async fn test_aggregate_offer_events() {
            let storage = SeaOrmStorage::in_memory().await.unwrap();
            for kind in [
                OfferEventKind::Impression,
                OfferEventKind::Impression,
                OfferEventKind::Win,
            ] {
                storage
                    .record_offer_event("enrollment_banner", "free_trial_week", kind, None)
                    .await
                    .unwrap();
            }
            storage
                .record_offer_event("enrollment_banner", "combine_discount", OfferEventKind::Impression, Some(1))
                .await
                .unwrap();

            let tallies = storage.aggregate_offer_events().await.unwrap();
            assert_eq!(tallies.len(), 2);
            let trial = tallies
                .iter()
                .find(|t| t.variant == "free_trial_week")
                .unwrap();
            assert_eq!((trial.impressions, trial.wins), (2, 1));
        }
    }
}
