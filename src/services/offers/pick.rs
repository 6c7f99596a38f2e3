use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferService, Selection, experiment_not_found, variant_not_found};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    offers::{
        entities::OfferEventKind,
        requests::{PickMode, PickOfferRequest},
        responses::PickOfferResponse,
    },
};

pub async fn pick_offer(
    service: &OfferService,
    request: &HttpRequest,
    experiment_name: &str,
    req: PickOfferRequest,
) -> ActixResult<HttpResponse> {
    let registry = service.get_registry(request)?;
    let Some(experiment) = registry.get(experiment_name) else {
        return Ok(experiment_not_found(experiment_name));
    };

    let selection = match (req.mode, req.variant.as_deref()) {
        (PickMode::Weighted, _) => Selection::Weighted,
        (PickMode::Explore, _) => Selection::Explore,
        (PickMode::Forced, Some(name)) => Selection::Forced(name),
        (PickMode::Forced, None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Forced mode requires a variant",
            )));
        }
    };

    // ThreadRng 不是 Send，需在 await 之前用完
    let picked = {
        let mut rng = rand::rng();
        experiment
            .pick(selection, &mut rng)
            .map(|variant| variant.name().to_string())
    };
    let Some(variant) = picked else {
        return Ok(variant_not_found(
            experiment_name,
            req.variant.as_deref().unwrap_or_default(),
        ));
    };

    service
        .record_event(
            request,
            experiment.name(),
            &variant,
            OfferEventKind::Impression,
            RequireJWT::extract_user_id(request),
        )
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PickOfferResponse {
            experiment: experiment.name().to_string(),
            variant,
        },
        "Offer picked",
    )))
}
