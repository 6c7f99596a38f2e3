use super::entities::{UserProfile, UserRole};
use serde::Deserialize;
use ts_rs::TS;

/// 注册请求（来自 HTTP）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profile: UserProfile,
}

/// 存储层创建用户参数，`password_hash` 必须已经哈希
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile: UserProfile,
}
