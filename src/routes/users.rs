use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::UserGradeParams;
use crate::models::submissions::requests::UserSubmissionParams;
use crate::services::{GradeService, SubmissionService, TranscriptService};

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);
static TRANSCRIPT_SERVICE: Lazy<TranscriptService> = Lazy::new(TranscriptService::new_lazy);

// getSubmissionsByUser
pub async fn list_user_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<UserSubmissionParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_user_submissions(&req, path.into_inner(), query.into_inner())
        .await
}

// getGradesByUser
pub async fn list_user_grades(
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<UserGradeParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_user_grades(&req, path.into_inner(), query.into_inner())
        .await
}

pub async fn get_transcript(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    TRANSCRIPT_SERVICE
        .get_transcript(&req, path.into_inner())
        .await
}

// 配置路由，学员只能访问自己的记录（业务层检查）
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users/{user_id}")
            .wrap(middlewares::RequireJWT)
            .route("/submissions", web::get().to(list_user_submissions))
            .route("/grades", web::get().to(list_user_grades))
            .route("/transcript", web::get().to(get_transcript)),
    );
}
