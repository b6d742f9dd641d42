//! `frontdesk status`: where the data lives and whether it's usable.

use comanda_db::migrations::migration_status;
use serde::Serialize;
use std::path::PathBuf;

use super::{Context, Output};
use crate::error::AppResult;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub db_path: PathBuf,
    pub healthy: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub service_fee_bps: u32,
    pub tables: i64,
    pub open_tabs: usize,
}

pub async fn run(ctx: Context<'_>) -> AppResult<Output> {
    let healthy = ctx.db.health_check().await;
    let (migrations_total, migrations_applied) = migration_status(ctx.db.pool()).await?;
    let tables = ctx.db.tables().count().await?;
    let open_tabs = ctx.db.tabs().list_open().await?.len();

    let report = StatusReport {
        db_path: ctx.config.db_path.clone(),
        healthy,
        migrations_total,
        migrations_applied,
        service_fee_bps: ctx.db.default_service_fee().bps(),
        tables,
        open_tabs,
    };

    let text = format!(
        "Database:    {}\nHealthy:     {}\nMigrations:  {}/{}\nService fee: {}\nTables:      {}\nOpen tabs:   {}",
        report.db_path.display(),
        if healthy { "yes" } else { "no" },
        migrations_applied,
        migrations_total,
        ctx.db.default_service_fee(),
        tables,
        open_tabs
    );

    Output::new(&report, text)
}
