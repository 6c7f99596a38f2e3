pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{CreateSubmissionRequest, UserSubmissionParams};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        submission: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, submission).await
    }

    // getSubmissionsByUser
    pub async fn list_user_submissions(
        &self,
        request: &HttpRequest,
        user_id: i64,
        params: UserSubmissionParams,
    ) -> ActixResult<HttpResponse> {
        list::list_user_submissions(self, request, user_id, params).await
    }
}
