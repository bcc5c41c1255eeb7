pub mod api;
pub mod barcode;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod storage;

pub use error::{Error, Result};
