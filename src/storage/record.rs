use serde::{Deserialize, Serialize};

/// One traceability entry, keyed by barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub barcode: String,
    pub batch_id: String,
    pub shift_id: String,
    pub place_id: String,
    pub manufacturing_date: String,
    pub quality_status: String,
    pub defect_type: String,
    pub operator_id: String,
    pub operator_name: String,
    pub timestamp: String,
    pub product_id: String,
    pub last_scanned_at: Option<String>,
}
