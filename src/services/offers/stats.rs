use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{OfferService, experiment_not_found};
use crate::models::{ApiResponse, offers::responses::OfferStatsResponse};

pub async fn get_stats(
    service: &OfferService,
    request: &HttpRequest,
    experiment_name: &str,
) -> ActixResult<HttpResponse> {
    let registry = service.get_registry(request)?;
    let Some(experiment) = registry.get(experiment_name) else {
        return Ok(experiment_not_found(experiment_name));
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OfferStatsResponse {
            experiment: experiment.name().to_string(),
            exploration_rate: experiment.exploration_rate(),
            variants: experiment.stats(),
        },
        "Offer stats retrieved successfully",
    )))
}
