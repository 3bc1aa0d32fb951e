pub mod condition;
pub mod simulate;

use axum::routing::post;
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;

use chronflow_core::store::Store;

pub fn build_router(store: &'static Store) -> Router {
    Router::new()
        .route("/condition", post(condition::condition))
        .route("/simulate", post(simulate::simulate))
        .layer(Extension(store))
        .layer(CorsLayer::permissive())
}
