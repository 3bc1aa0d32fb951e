//! Thin request layer for the conditioning pipeline: deserializes a
//! conditioning/simulation request, calls into `chronflow_core`, and
//! serializes the response. Routing, CORS, and process wiring only —
//! auth, persistence, and static asset serving are explicitly out of
//! scope and live elsewhere.

mod error;
mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = chronflow_core::store::global();
    let app = routes::build_router(store);

    let addr = std::env::var("CHRONFLOW_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "chronflow-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
