use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value as JsonValue;

use campdex_catalog::{ReviewDraft, ReviewId};
use campdex_core::ResourceId;

use crate::app::routes::providers::parse_provider_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_reviews))
        .route("/:id", get(get_review).put(update_review).delete(delete_review))
}

fn parse_review_id(raw: &str) -> Result<ReviewId, axum::response::Response> {
    raw.parse::<ResourceId>().map(ReviewId::new).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid review id")
    })
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let intent = campdex_query::compile(params);
    match services.reviews.list(&intent) {
        Ok(found) => dto::list_ok(found),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `GET /providers/:id/reviews`.
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
    match services.reviews.list_for_provider(provider_id, intent) {
        Ok(found) => dto::list_ok(found),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `POST /providers/:id/reviews`.
pub async fn create_for_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(draft): Json<ReviewDraft>,
) -> axum::response::Response {
    let provider_id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.reviews.create(provider_id, draft) {
        Ok(review) => dto::created(&review),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_review_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.reviews.get(id) {
        Ok(review) => dto::item_ok(&review),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<JsonValue>,
) -> axum::response::Response {
    let id = match parse_review_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.reviews.update(id, patch) {
        Ok(review) => dto::item_ok(&review),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_review(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_review_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.reviews.delete(id) {
        Ok(()) => dto::deleted(id),
        Err(e) => errors::domain_error_to_response(e),
    }
}
