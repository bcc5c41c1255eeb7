use crate::api::lookup::handlers::lookup_handler;
use crate::api::models::AppState;
use axum::{routing::post, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lookup", post(lookup_handler))
}
