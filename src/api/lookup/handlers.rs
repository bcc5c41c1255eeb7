use crate::api::models::*;
use crate::lookup;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::warn;

pub async fn lookup_handler(
    State(state): State<AppState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<FoundResponse>, AppError> {
    // An unreadable body has no barcode to normalize
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Unreadable lookup body");
        AppError::InvalidInput
    })?;

    let outcome = lookup::lookup(&state.store, state.enricher.as_ref(), request.barcode.as_ref()).await?;

    Ok(Json(outcome.into()))
}
