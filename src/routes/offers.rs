use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::offers::requests::{PickOfferRequest, RecordWinRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::OfferService;

// 懒加载的全局 OfferService 实例
static OFFER_SERVICE: Lazy<OfferService> = Lazy::new(OfferService::new_lazy);

// pickOffer，请求体可省略（默认加权模式）
pub async fn pick_offer(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let pick_request = if body.iter().all(u8::is_ascii_whitespace) {
        PickOfferRequest::default()
    } else {
        match serde_json::from_slice::<PickOfferRequest>(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    format!("Invalid pick request: {e}"),
                )));
            }
        }
    };

    OFFER_SERVICE
        .pick_offer(&req, &path.into_inner(), pick_request)
        .await
}

// recordWin
pub async fn record_win(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<RecordWinRequest>,
) -> ActixResult<HttpResponse> {
    OFFER_SERVICE
        .record_win(&req, &path.into_inner(), body.into_inner())
        .await
}

// getStats
pub async fn get_stats(req: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    OFFER_SERVICE.get_stats(&req, &path.into_inner()).await
}

// 配置路由
pub fn configure_offers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offers/{experiment}")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/pick")
                    .wrap(RateLimit::offer_pick())
                    .route(web::post().to(pick_offer)),
            )
            .service(web::resource("/win").route(web::post().to(record_win)))
            .service(
                web::resource("/stats")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(get_stats)),
            ),
    );
}
