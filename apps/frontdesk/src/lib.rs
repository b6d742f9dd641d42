//! # Comanda Front Desk
//!
//! Terminal front desk over the comanda ledger. Parses a command, opens the
//! database, runs the command and prints its output.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()          RUST_LOG or warn,comanda_db=info (stderr)  │
//! │  2. FrontDeskConfig         flags → env → defaults                      │
//! │  3. Database::new()         pool + embedded migrations                  │
//! │  4. dispatch()              one command, one Output                     │
//! │  5. print + db.close()                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use comanda_db::{Database, DbConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::{dispatch, Context};
use crate::config::FrontDeskConfig;
use crate::error::AppResult;

const DEFAULT_LOG_FILTER: &str = "warn,comanda_db=info,frontdesk=info";

/// Installs the global subscriber. Logs go to stderr; stdout is for output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one parsed invocation to completion.
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = FrontDeskConfig::resolve(&cli.global)?;
    debug!(db_path = %config.db_path.display(), fee = %config.service_fee, "Configuration resolved");

    let db = Database::new(DbConfig::new(&config.db_path).service_fee(config.service_fee)).await?;

    let result = dispatch(Context { db: &db, config: &config }, cli.command).await;
    db.close().await;

    let output = result?;
    println!("{}", output.render(cli.global.json)?);
    Ok(())
}
