use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferService, experiment_not_found, variant_not_found};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    offers::{entities::OfferEventKind, requests::RecordWinRequest, responses::RecordWinResponse},
};

pub async fn record_win(
    service: &OfferService,
    request: &HttpRequest,
    experiment_name: &str,
    req: RecordWinRequest,
) -> ActixResult<HttpResponse> {
    let registry = service.get_registry(request)?;
    let Some(experiment) = registry.get(experiment_name) else {
        return Ok(experiment_not_found(experiment_name));
    };

    let Some(wins) = experiment.record_win(&req.variant) else {
        return Ok(variant_not_found(experiment_name, &req.variant));
    };

    service
        .record_event(
            request,
            experiment.name(),
            &req.variant,
            OfferEventKind::Win,
            RequireJWT::extract_user_id(request),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RecordWinResponse {
            experiment: experiment.name().to_string(),
            variant: req.variant,
            wins,
        },
        "Win recorded",
    )))
}
