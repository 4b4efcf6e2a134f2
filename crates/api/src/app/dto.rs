//! Response envelope helpers.
//!
//! Request bodies deserialize straight into the catalog draft types
//! (`ProviderDraft`, `CourseDraft`, `ReviewDraft`); update payloads stay raw
//! JSON and are sanitized by the repositories.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

/// `200 OK` with a counted listing.
pub fn list_ok(resources: Vec<JsonValue>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "Success",
            "count": resources.len(),
            "data": resources,
        })),
    )
        .into_response()
}

/// `200 OK` with a single resource.
pub fn item_ok<T: Serialize>(resource: &T) -> axum::response::Response {
    envelope(StatusCode::OK, resource)
}

/// `201 Created` with the stored resource.
pub fn created<T: Serialize>(resource: &T) -> axum::response::Response {
    envelope(StatusCode::CREATED, resource)
}

/// `200 OK` acknowledging a deletion.
pub fn deleted(id: impl core::fmt::Display) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "Success",
            "data": { "id": id.to_string() },
        })),
    )
        .into_response()
}

fn envelope<T: Serialize>(status: StatusCode, resource: &T) -> axum::response::Response {
    (
        status,
        Json(json!({
            "status": "Success",
            "data": resource,
        })),
    )
        .into_response()
}
