pub mod assignments;
pub mod auth;
pub mod courses;
pub mod grades;
pub mod notifications;
pub mod offers;
pub mod submissions;
pub mod system;
pub mod transcripts;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use grades::GradeService;
pub use notifications::NotificationService;
pub use offers::OfferService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use transcripts::TranscriptService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 从 app_data 取出存储层
pub(crate) fn storage_from_request(request: &HttpRequest) -> actix_web::Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            tracing::error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("storage unavailable")
        })
}

/// 当前登录用户；路由未挂 RequireJWT 时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 学生只能访问自己的记录，教练与管理员不受限
pub(crate) fn ensure_self_or_staff(user: &User, target_user_id: i64) -> Result<(), HttpResponse> {
    if user.id == target_user_id || user.role.is_staff() {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only access your own records",
        )))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 路由级测试共用的应用装配

    use actix_web::{App, dev::ServiceResponse, test, web};
    use std::sync::Arc;

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::AppStartTime;
    use crate::models::users::{
        entities::{User, UserProfile, UserRole},
        requests::CreateUserRequest,
    };
    use crate::services::offers::OfferRegistry;
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};
    use crate::utils::jwt::JwtUtils;

    pub struct TestContext {
        pub storage: Arc<dyn Storage>,
        pub cache: Arc<dyn ObjectCache>,
        pub offers: Arc<OfferRegistry>,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let storage: Arc<dyn Storage> = Arc::new(
                SeaOrmStorage::in_memory()
                    .await
                    .expect("in-memory storage"),
            );
            let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(1000, 60));
            let offers = Arc::new(
                OfferRegistry::from_config(&crate::config::AppConfig::get().offers)
                    .expect("offer config"),
            );
            Self {
                storage,
                cache,
                offers,
            }
        }

        /// 直接写库创建用户（跳过密码哈希），返回用户与 access token
        pub async fn user(&self, username: &str, role: UserRole) -> (User, String) {
            let user = self
                .storage
                .create_user(CreateUserRequest {
                    username: username.to_string(),
                    email: format!("{username}@academy.test"),
                    password_hash: "unused".to_string(),
                    role,
                    profile: UserProfile::default(),
                })
                .await
                .expect("create user");
            let token =
                JwtUtils::generate_access_token(user.id, &user.role.to_string()).expect("token");
            (user, token)
        }

        pub async fn call(
            &self,
            req: test::TestRequest,
        ) -> ServiceResponse {
            let app = test::init_service(
                App::new()
                    .app_data(web::Data::new(self.storage.clone()))
                    .app_data(web::Data::new(self.cache.clone()))
                    .app_data(web::Data::new(self.offers.clone()))
                    .app_data(web::Data::new(AppStartTime {
                        start_datetime: chrono::Utc::now(),
                    }))
                    .app_data(crate::utils::json_config(1 << 20))
                    .app_data(crate::utils::query_config())
                    .app_data(crate::utils::path_config())
                    .configure(crate::routes::configure_all_routes),
            )
            .await;
            test::call_service(&app, req.to_request()).await
        }
    }

    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }
}
