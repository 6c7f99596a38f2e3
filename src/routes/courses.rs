use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

// listCourses
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn get_course(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, path.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(&req, body.into_inner()).await
}

pub async fn enroll(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.enroll(&req, path.into_inner()).await
}

pub async fn complete_enrollment(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, user_id) = path.into_inner();
    COURSE_SERVICE
        .complete_enrollment(&req, course_id, user_id)
        .await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    // 创建课程 - 仅教练和管理员
                    .route(
                        web::post()
                            .to(create_course)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(web::resource("/{id}").route(web::get().to(get_course)))
            .service(web::resource("/{id}/enroll").route(web::post().to(enroll)))
            .service(
                web::resource("/{id}/enrollments/{user_id}/complete")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(complete_enrollment)),
            ),
    );
}
