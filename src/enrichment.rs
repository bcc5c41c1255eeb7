use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Failure talking to the analysis service
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Analysis service keyed on product id.
#[async_trait]
pub trait Enricher: Send + Sync + 'static {
    async fn trigger(&self, product_id: &str) -> Result<Value, EnrichmentError>;
}

/// Calls `POST {base_url}/trigger` with `{"product_id": ...}`.
pub struct HttpEnricher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEnricher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn trigger_url(&self) -> String {
        format!("{}/trigger", self.base_url)
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn trigger(&self, product_id: &str) -> Result<Value, EnrichmentError> {
        let url = self.trigger_url();
        debug!(%url, product_id, "Triggering analysis");

        let resp = self
            .http
            .post(&url)
            .json(&json!({ "product_id": product_id }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Pass the body through; non-JSON payloads come back as a string.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
