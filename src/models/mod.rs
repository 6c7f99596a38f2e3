//! 业务数据模型
//!
//! HTTP 请求/响应结构与存储层之间传递的业务实体。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod grades;
pub mod notifications;
pub mod offers;
pub mod submissions;
pub mod system;
pub mod transcripts;
pub mod users;

pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 应用级错误码（写入 `ApiResponse.code`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,
    NotImplemented = 1501,

    // 认证与用户
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserNameAlreadyExists = 2005,
    UserEmailAlreadyExists = 2006,
    UserNotFound = 2007,

    // 课程与选课
    CourseNotFound = 3000,
    CourseCodeAlreadyExists = 3001,
    CourseInactive = 3002,
    AlreadyEnrolled = 3003,
    NotEnrolled = 3004,

    // 作业、提交与评分
    AssignmentNotFound = 4000,
    AssignmentClosed = 4001,
    SubmissionNotFound = 4100,
    GradeAlreadyExists = 4200,
    GradeInvalidScore = 4201,

    // 通知
    NotificationNotFound = 5000,

    // 推广方案实验
    OfferExperimentNotFound = 6000,
    OfferVariantNotFound = 6001,
}

/// 进程启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
