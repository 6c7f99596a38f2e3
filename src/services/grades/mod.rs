pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{GradeSubmissionRequest, UserGradeParams};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::grade_submission(self, request, submission_id, grade).await
    }

    // getGradesByUser
    pub async fn list_user_grades(
        &self,
        request: &HttpRequest,
        user_id: i64,
        params: UserGradeParams,
    ) -> ActixResult<HttpResponse> {
        list::list_user_grades(self, request, user_id, params).await
    }
}
