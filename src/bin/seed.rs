//! Replace the record store with the rows of a traceability CSV.

use anyhow::Context;
use barcode_lookup_server::config::AppConfig;
use barcode_lookup_server::loader;
use barcode_lookup_server::storage::RecordStore;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed the barcode store from a CSV file")]
struct Args {
    /// CSV file to load (defaults to `seed.csv_path` from the config)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Database file (defaults to `storage.db_path` from the config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Config file
    #[arg(long, env = "BARCODE_CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let config = AppConfig::load_from(&args.config).context("failed to load configuration")?;

    let csv_path = args.csv.unwrap_or(config.seed.csv_path);
    let db_path = args.db.unwrap_or(config.storage.db_path);

    let store = RecordStore::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    match loader::seed(&store, &csv_path) {
        Ok(report) => {
            info!("✅ Inserted {} records ({} skipped)", report.inserted, report.skipped);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "❌ Seeding failed");
            Err(e).with_context(|| format!("failed to seed from {}", csv_path.display()))
        }
    }
}
