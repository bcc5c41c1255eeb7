use crate::barcode;
use crate::enrichment::{Enricher, EnrichmentError};
use crate::storage::RecordStore;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A resolved scan, enriched by the analysis service
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    pub barcode: String,
    pub product_id: String,
    pub manufacturing_date: String,
    pub ml_result: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid barcode: {0:?}")]
    InvalidInput(String),

    #[error("barcode not found: {0}")]
    NotFound(String),

    #[error("analysis trigger failed: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Internal(#[from] crate::Error),
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Resolve a raw scanner payload.
///
/// The scan timestamp is written before the analysis call and stays written
/// when that call fails.
pub async fn lookup(
    store: &Arc<RecordStore>,
    enricher: &dyn Enricher,
    raw: Option<&Value>,
) -> Result<LookupOutcome, LookupError> {
    let Some(code) = barcode::normalize(raw) else {
        let rejected = barcode::sanitize(&barcode::coerce(raw));
        warn!(barcode = %rejected, "Rejected malformed barcode");
        return Err(LookupError::InvalidInput(rejected));
    };

    info!(barcode = %code, "Received barcode");

    let scanned = {
        let store = Arc::clone(store);
        let code = code.clone();
        tokio::task::spawn_blocking(move || store.mark_scanned(&code, &now_iso()))
            .await
            .map_err(crate::Error::from)
            .and_then(|res| res)
    };

    let record = scanned
        .inspect_err(|e| error!(barcode = %code, error = %e, "Lookup failed"))?
        .ok_or_else(|| {
            warn!(barcode = %code, "Barcode not found");
            LookupError::NotFound(code.clone())
        })?;

    info!(barcode = %record.barcode, product_id = %record.product_id, "Record found");

    let ml_result = enricher
        .trigger(&record.product_id)
        .await
        .inspect_err(|e| error!(product_id = %record.product_id, error = %e, "Analysis trigger failed"))?;

    Ok(LookupOutcome {
        barcode: record.barcode,
        product_id: record.product_id,
        manufacturing_date: record.manufacturing_date,
        ml_result,
    })
}
