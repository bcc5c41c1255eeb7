use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration, read from TOML with environment overrides
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ml: MlConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/barcodes.db"),
        }
    }
}

/// External analysis service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub csv_path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/pcb_traceability_labeled_dataset.csv"),
        }
    }
}

impl AppConfig {
    /// Load from `$BARCODE_CONFIG` (or `config.toml`), then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("BARCODE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            Self::from_toml(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value: {}", port))?;
        }
        if let Ok(db_path) = std::env::var("BARCODE_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }
        if let Ok(url) = std::env::var("ML_API_URL") {
            self.ml.base_url = url;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
