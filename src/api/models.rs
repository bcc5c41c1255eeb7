use crate::enrichment::Enricher;
use crate::lookup::{LookupError, LookupOutcome};
use crate::storage::RecordStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub enricher: Arc<dyn Enricher>,
}

/// Scanner payload. `barcode` may be any JSON value; it is coerced to text.
/// `None` means the field was absent, `Some(Value::Null)` an explicit null.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default, deserialize_with = "present")]
    pub barcode: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Successful lookup
#[derive(Debug, Serialize)]
pub struct FoundResponse {
    pub status: &'static str,
    pub barcode: String,
    pub product_id: String,
    pub manufacturing_date: String,
    pub ml_result: Value,
}

impl From<LookupOutcome> for FoundResponse {
    fn from(outcome: LookupOutcome) -> Self {
        Self {
            status: "found",
            barcode: outcome.barcode,
            product_id: outcome.product_id,
            manufacturing_date: outcome.manufacturing_date,
            ml_result: outcome.ml_result,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidInput,
    NotFound,
    MlError,
    Internal,
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidInput(_) => AppError::InvalidInput,
            LookupError::NotFound(_) => AppError::NotFound,
            LookupError::Enrichment(_) => AppError::MlError,
            LookupError::Internal(e) => {
                error!("Internal error: {}", e);
                AppError::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status, message) = match self {
            AppError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                "error",
                "Barcode must be a 13-digit string",
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", "Barcode not found"),
            AppError::MlError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ml_error",
                "ML API trigger failed",
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error",
                "Internal server error",
            ),
        };

        (code, Json(ErrorResponse { status, message })).into_response()
    }
}
