pub mod pick;
pub mod picker;
pub mod registry;
pub mod stats;
pub mod win;

pub use picker::{OfferExperiment, OfferVariant, Selection};
pub use registry::OfferRegistry;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    offers::{
        entities::OfferEventKind,
        requests::{PickOfferRequest, RecordWinRequest},
    },
};
use crate::storage::Storage;

pub struct OfferService {
    storage: Option<Arc<dyn Storage>>,
}

impl OfferService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_registry(&self, request: &HttpRequest) -> ActixResult<Arc<OfferRegistry>> {
        request
            .app_data::<web::Data<Arc<OfferRegistry>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| {
                tracing::error!("Offer registry not found in app data");
                actix_web::error::ErrorInternalServerError("offer registry unavailable")
            })
    }

    // pickOffer
    pub async fn pick_offer(
        &self,
        request: &HttpRequest,
        experiment: &str,
        req: PickOfferRequest,
    ) -> ActixResult<HttpResponse> {
        pick::pick_offer(self, request, experiment, req).await
    }

    // recordWin
    pub async fn record_win(
        &self,
        request: &HttpRequest,
        experiment: &str,
        req: RecordWinRequest,
    ) -> ActixResult<HttpResponse> {
        win::record_win(self, request, experiment, req).await
    }

    // getStats
    pub async fn get_stats(&self, request: &HttpRequest, experiment: &str) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request, experiment).await
    }

    /// 追加事件，失败只记日志
    pub(crate) async fn record_event(
        &self,
        request: &HttpRequest,
        experiment: &str,
        variant: &str,
        kind: OfferEventKind,
        user_id: Option<i64>,
    ) {
        let storage = match self.get_storage(request) {
            Ok(storage) => storage,
            Err(_) => return,
        };
        if let Err(e) = storage
            .record_offer_event(experiment, variant, kind, user_id)
            .await
        {
            tracing::warn!(
                "Failed to persist offer {} for {}/{}: {}",
                kind,
                experiment,
                variant,
                e
            );
        }
    }
}

pub(crate) fn experiment_not_found(experiment: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::OfferExperimentNotFound,
        format!("Offer experiment '{experiment}' not found"),
    ))
}

pub(crate) fn variant_not_found(experiment: &str, variant: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::OfferVariantNotFound,
        format!("Variant '{variant}' not found in experiment '{experiment}'"),
    ))
}
