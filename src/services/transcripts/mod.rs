pub mod calc;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct TranscriptService {
    storage: Option<Arc<dyn Storage>>,
}

impl TranscriptService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn get_transcript(&self, request: &HttpRequest, user_id: i64) -> ActixResult<HttpResponse> {
        get::get_transcript(self, request, user_id).await
    }
}
