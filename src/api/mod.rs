pub mod lookup;
pub mod models;

// Re-exports
pub use models::*;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub const HEALTH_MESSAGE: &str = "Barcode Lookup Server is Running";

// Health handler (simple, keep here)
pub async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

/// Build the HTTP router over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .merge(lookup::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
