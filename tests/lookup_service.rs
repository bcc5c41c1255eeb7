mod common;

use async_trait::async_trait;
use axum::{http::StatusCode, response::IntoResponse};
use barcode_lookup_server::api::AppError;
use barcode_lookup_server::enrichment::{Enricher, EnrichmentError};
use barcode_lookup_server::lookup::{lookup, LookupError};
use barcode_lookup_server::storage::RecordStore;
use barcode_lookup_server::Error;
use common::{seeded_store, StubEnricher};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Fails every call, after noting what the store held at call time.
struct StoreObserver {
    store: Arc<RecordStore>,
    seen: Mutex<Option<Option<String>>>,
}

#[async_trait]
impl Enricher for StoreObserver {
    async fn trigger(&self, _product_id: &str) -> Result<Value, EnrichmentError> {
        let record = self.store.get("1234567890123").unwrap().unwrap();
        *self.seen.lock().unwrap() = Some(record.last_scanned_at);
        Err(EnrichmentError::Status {
            status: 500,
            body: String::new(),
        })
    }
}

#[tokio::test]
async fn scan_is_recorded_before_enrichment() {
    let store = seeded_store();
    let observer = StoreObserver {
        store: store.clone(),
        seen: Mutex::new(None),
    };

    let err = lookup(&store, &observer, Some(&json!("1234567890123")))
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Enrichment(_)));
    let seen = observer.seen.lock().unwrap().clone();
    assert!(matches!(seen, Some(Some(_))), "enricher saw {seen:?}");
}

#[tokio::test]
async fn invalid_lengths_never_touch_the_store() {
    let store = seeded_store();
    let enricher = StubEnricher::ok(json!({}));

    for raw in [json!(""), json!("123"), json!("12345678901234"), json!(true)] {
        let err = lookup(&store, enricher.as_ref(), Some(&raw)).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidInput(_)), "{raw} gave {err:?}");
    }

    assert!(enricher.calls().is_empty());
    for code in ["1234567890123", "4006381333931"] {
        assert!(store.get(code).unwrap().unwrap().last_scanned_at.is_none());
    }
}

#[tokio::test]
async fn timestamp_is_iso_utc() {
    let store = seeded_store();
    let enricher = StubEnricher::ok(json!({}));

    lookup(&store, enricher.as_ref(), Some(&json!("4006381333931")))
        .await
        .unwrap();

    let scanned = store.get("4006381333931").unwrap().unwrap().last_scanned_at.unwrap();
    assert!(scanned.ends_with('Z'), "{scanned}");
    assert!(chrono::DateTime::parse_from_rfc3339(&scanned).is_ok());
}

#[tokio::test]
async fn outcome_carries_ml_body_verbatim() {
    let store = seeded_store();
    let body = json!({ "success": false, "reason": "Image not found for product_id" });
    let enricher = StubEnricher::ok(body.clone());

    let outcome = lookup(&store, enricher.as_ref(), Some(&json!("1234567890123")))
        .await
        .unwrap();

    assert_eq!(outcome.product_id, "P9");
    assert_eq!(outcome.manufacturing_date, "2024-03-18");
    assert_eq!(outcome.ml_result, body);
}

#[test]
fn internal_errors_map_to_generic_500() {
    let response = AppError::from(LookupError::Internal(Error::LockPoisoned)).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
