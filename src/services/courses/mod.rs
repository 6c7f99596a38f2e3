pub mod complete;
pub mod create;
pub mod enroll;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{CourseListParams, CreateCourseRequest};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // listCourses
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        params: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, params).await
    }

    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_course(self, request, course_id).await
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        course: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, course).await
    }

    pub async fn enroll(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        enroll::enroll(self, request, course_id).await
    }

    pub async fn complete_enrollment(
        &self,
        request: &HttpRequest,
        course_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        complete::complete_enrollment(self, request, course_id, user_id).await
    }
}
