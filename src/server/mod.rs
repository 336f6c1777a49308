pub mod routes;

use crate::state::AppState;
use std::sync::Arc;

/// Build the report API router.
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/report", axum::routing::get(routes::get_report))
        .route("/api/prices", axum::routing::get(routes::get_prices))
        .route("/api/returns", axum::routing::get(routes::get_returns))
        .route("/api/histogram", axum::routing::get(routes::get_histogram))
        .route("/api/var", axum::routing::get(routes::get_var))
        .route("/api/counters", axum::routing::get(routes::get_counters))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}

/// Serve the report until the process is stopped.
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("report server listening on {addr}");
    axum::serve(listener, router(state)).await
}
