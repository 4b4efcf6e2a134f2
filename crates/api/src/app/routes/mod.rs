use axum::Router;

pub mod courses;
pub mod providers;
pub mod reviews;
pub mod system;

/// Full resource routing tree.
pub fn router() -> Router {
    Router::new()
        .nest("/providers", providers::router())
        .nest("/courses", courses::router())
        .nest("/reviews", reviews::router())
}
