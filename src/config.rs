//! Configuration
//!
//! Settings shared by every command, read from CLI flags, then the
//! environment, then a `.env` file.

use std::path::PathBuf;

use clap::Args;

use crate::{
    basket::DEFAULT_DELIVERY_LEAD_DAYS,
    catalog::{Catalog, CatalogError},
};

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub log_format: LogFormat,
}

/// Store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Product catalog YAML file; the bundled vegetable catalog when omitted
    #[arg(long, global = true, env = "HARVEST_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Directory holding the signed-in session
    #[arg(long, global = true, env = "HARVEST_SESSION_DIR", default_value = ".harvest")]
    pub session_dir: PathBuf,

    /// Days between today and the default delivery date of new basket lines
    #[arg(
        long,
        global = true,
        env = "HARVEST_DELIVERY_LEAD_DAYS",
        default_value_t = DEFAULT_DELIVERY_LEAD_DAYS,
        value_parser = clap::value_parser!(i64).range(0..=365)
    )]
    pub delivery_lead_days: i64,
}

impl StoreConfig {
    /// Load the configured catalog, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or parsed.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::sample(),
        }
    }
}
