use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value as JsonValue;

use campdex_catalog::{CourseDraft, CourseId};
use campdex_core::ResourceId;

use crate::app::routes::providers::parse_provider_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_courses))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

fn parse_course_id(raw: &str) -> Result<CourseId, axum::response::Response> {
    raw.parse::<ResourceId>().map(CourseId::new).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid course id")
    })
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let intent = campdex_query::compile(params);
    match services.courses.list(&intent) {
        Ok(found) => dto::list_ok(found),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `GET /providers/:id/courses`: listing scoped to one parent.
pub async fn list_for_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let provider_id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let intent = campdex_query::compile(params);
    match services.courses.list_for_provider(provider_id, intent) {
        Ok(found) => dto::list_ok(found),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `POST /providers/:id/courses`.
pub async fn create_for_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> axum::response::Response {
    let provider_id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.courses.create(provider_id, draft) {
        Ok(course) => dto::created(&course),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.courses.get(id) {
        Ok(course) => dto::item_ok(&course),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<JsonValue>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.courses.update(id, patch) {
        Ok(course) => dto::item_ok(&course),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_course_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.courses.delete(id) {
        Ok(()) => dto::deleted(id),
        Err(e) => errors::domain_error_to_response(e),
    }
}
