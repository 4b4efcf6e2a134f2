use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value as JsonValue;

use campdex_catalog::{ProviderDraft, ProviderId};
use campdex_core::ResourceId;

use crate::app::routes::{courses, reviews};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_provider).get(list_providers))
        .route(
            "/:id",
            get(get_provider).put(update_provider).delete(delete_provider),
        )
        .route(
            "/:id/courses",
            get(courses::list_for_provider).post(courses::create_for_provider),
        )
        .route(
            "/:id/reviews",
            get(reviews::list_for_provider).post(reviews::create_for_provider),
        )
}

pub(crate) fn parse_provider_id(raw: &str) -> Result<ProviderId, axum::response::Response> {
    raw.parse::<ResourceId>()
        .map(ProviderId::new)
        .map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid provider id")
        })
}

pub async fn create_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<ProviderDraft>,
) -> axum::response::Response {
    match services.providers.create(draft) {
        Ok(provider) => dto::created(&provider),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_providers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let intent = campdex_query::compile(params);
    match services.providers.list(&intent) {
        Ok(found) => dto::list_ok(found),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.providers.get(id) {
        Ok(provider) => dto::item_ok(&provider),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<JsonValue>,
) -> axum::response::Response {
    let id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.providers.update(id, patch) {
        Ok(provider) => dto::item_ok(&provider),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_provider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_provider_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.providers.delete(id) {
        Ok(()) => dto::deleted(id),
        Err(e) => errors::domain_error_to_response(e),
    }
}
