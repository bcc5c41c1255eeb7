#![allow(dead_code)]

use async_trait::async_trait;
use barcode_lookup_server::enrichment::{Enricher, EnrichmentError};
use barcode_lookup_server::storage::{Record, RecordStore};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Analysis service double: answers with a canned body or a status error,
/// and remembers which product ids it was asked about.
pub struct StubEnricher {
    response: Option<Value>,
    pub calls: Mutex<Vec<String>>,
}

impl StubEnricher {
    pub fn ok(body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: Some(body),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Enricher for StubEnricher {
    async fn trigger(&self, product_id: &str) -> Result<Value, EnrichmentError> {
        self.calls.lock().unwrap().push(product_id.to_string());
        match &self.response {
            Some(body) => Ok(body.clone()),
            None => Err(EnrichmentError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }
}

pub fn record(barcode: &str, product_id: &str) -> Record {
    Record {
        barcode: barcode.to_string(),
        batch_id: "BATCH-01".to_string(),
        shift_id: "SHIFT-A".to_string(),
        place_id: "LINE-3".to_string(),
        manufacturing_date: "2024-03-18".to_string(),
        quality_status: "PASS".to_string(),
        defect_type: "none".to_string(),
        operator_id: "OP-17".to_string(),
        operator_name: "Sam".to_string(),
        timestamp: "2024-03-18 09:12:44".to_string(),
        product_id: product_id.to_string(),
        last_scanned_at: None,
    }
}

pub fn seeded_store() -> Arc<RecordStore> {
    let store = RecordStore::in_memory().unwrap();
    store
        .replace_all(&[
            record("1234567890123", "P9"),
            record("4006381333931", "P12"),
        ])
        .unwrap();
    Arc::new(store)
}
