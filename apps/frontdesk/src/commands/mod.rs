//! # Front Desk Commands
//!
//! One module per command group. Every command returns an [`Output`]
//! holding both renderings; `--json` picks which one is printed.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cli::parse() → Command::Tab(TabCommand::Close { tab: 12 })            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dispatch() ──► tab::run() ──► db.tabs().close_tab(12)                 │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                 Output { json: {...}, text: "Closed tab 12 ..." }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod menu;
pub mod staff;
pub mod status;
pub mod tab;
pub mod table;

use comanda_core::Money;
use comanda_db::Database;
use serde::Serialize;

use crate::cli::Command;
use crate::config::FrontDeskConfig;
use crate::error::AppResult;

/// What a command produced, ready to print either way.
#[derive(Debug, Clone)]
pub struct Output {
    pub json: serde_json::Value,
    pub text: String,
}

impl Output {
    /// Captures `value` for `--json` and `text` for the terminal.
    pub fn new<T: Serialize>(value: &T, text: impl Into<String>) -> AppResult<Self> {
        Ok(Output {
            json: serde_json::to_value(value)?,
            text: text.into(),
        })
    }

    /// Renders for printing.
    pub fn render(&self, json: bool) -> AppResult<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Everything a command needs.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub db: &'a Database,
    pub config: &'a FrontDeskConfig,
}

impl Context<'_> {
    /// Formats cents with the configured currency symbol.
    pub fn money(&self, cents: i64) -> String {
        Money::from_cents(cents).format_with_symbol(&self.config.currency_symbol)
    }
}

/// Routes a parsed command to its handler.
pub async fn dispatch(ctx: Context<'_>, command: Command) -> AppResult<Output> {
    match command {
        Command::Tab(cmd) => tab::run(ctx, cmd).await,
        Command::Table(cmd) => table::run(ctx, cmd).await,
        Command::Menu(cmd) => menu::run(ctx, cmd).await,
        Command::Staff(cmd) => staff::run(ctx, cmd).await,
        Command::Customer(cmd) => customer::run(ctx, cmd).await,
        Command::Status => status::run(ctx).await,
    }
}

/// Placeholder for empty optional columns.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
