//! # Front Desk Configuration
//!
//! Resolved once at startup; read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`, `--service-fee-bps`, `--currency`)
//! 2. Environment variables (`COMANDA_*`, read by clap)
//! 3. Defaults (this file)

use comanda_core::validation::validate_service_fee_bps;
use comanda_core::ServiceFeeRate;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::error::{AppError, AppResult};

/// Default currency symbol for display.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Database file name inside the platform data directory.
const DB_FILE_NAME: &str = "comanda.db";

/// Front desk configuration.
#[derive(Debug, Clone, Serialize)]
pub struct FrontDeskConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Fee captured by newly opened tabs.
    pub service_fee: ServiceFeeRate,

    /// Symbol printed before amounts.
    pub currency_symbol: String,
}

impl FrontDeskConfig {
    /// Resolves configuration from parsed flags, which already carry any
    /// `COMANDA_*` environment values.
    pub fn resolve(args: &GlobalArgs) -> AppResult<Self> {
        let db_path = match &args.db {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };

        let service_fee = match args.service_fee_bps {
            Some(bps) => {
                validate_service_fee_bps(bps)?;
                ServiceFeeRate::from_bps(bps)
            }
            None => ServiceFeeRate::default(),
        };

        let currency_symbol = args
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
            .to_string();

        Ok(FrontDeskConfig {
            db_path,
            service_fee,
            currency_symbol,
        })
    }
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **Linux**: `~/.local/share/comanda/comanda.db`
/// - **macOS**: `~/Library/Application Support/br.comanda.comanda/comanda.db`
/// - **Windows**: `%APPDATA%\comanda\comanda\data\comanda.db`
fn default_database_path() -> AppResult<PathBuf> {
    let dirs = ProjectDirs::from("br", "comanda", "comanda")
        .ok_or_else(|| AppError::internal("Could not determine app data directory"))?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join(DB_FILE_NAME))
}
