//! # Table Commands

use comanda_core::{NewTable, Tab, TableOverview, TableStatus, ValidationError};
use std::fmt::Write;

use super::{Context, Output};
use crate::cli::TableCommand;
use crate::error::AppResult;

pub async fn run(ctx: Context<'_>, command: TableCommand) -> AppResult<Output> {
    match command {
        TableCommand::Add { capacity, reserved } => {
            let status = if reserved {
                TableStatus::Reserved
            } else {
                TableStatus::Free
            };
            let table = ctx.db.tables().insert(&NewTable { capacity, status }).await?;
            let text = format!(
                "Added table {} ({} seats, {})",
                table.id, table.capacity, table.status
            );
            Output::new(&table, text)
        }

        TableCommand::List => {
            let tables = ctx.db.tables().list_overview().await?;
            let text = render_tables(&tables);
            Output::new(&tables, text)
        }

        TableCommand::Edit {
            id,
            capacity,
            status,
        } => {
            if capacity.is_none() && status.is_none() {
                return Err(ValidationError::Required {
                    field: "--capacity or --status".to_string(),
                }
                .into());
            }

            let mut table = None;
            if let Some(capacity) = capacity {
                table = Some(ctx.db.tables().update_capacity(id, capacity).await?);
            }
            if let Some(status) = status {
                table = Some(ctx.db.tables().set_status(id, status).await?);
            }

            let text = match &table {
                Some(t) => format!("Table {}: {} seats, {}", t.id, t.capacity, t.status),
                None => String::new(),
            };
            Output::new(&table, text)
        }

        TableCommand::History { id } => {
            let tabs = ctx.db.tabs().history_for_table(id).await?;
            let text = render_history(ctx, &tabs);
            Output::new(&tabs, text)
        }

        TableCommand::Delete { id } => {
            ctx.db.tables().delete(id).await?;
            Output::new(&serde_json::json!({ "deleted": id }), format!("Deleted table {id}"))
        }
    }
}

fn render_tables(tables: &[TableOverview]) -> String {
    if tables.is_empty() {
        return "No tables.".to_string();
    }

    let mut out = format!("{:<6} {:<10} {:>6} {:>6}\n", "TABLE", "STATUS", "SEATS", "TAB");
    for table in tables {
        let tab = table
            .open_tab_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<6} {:<10} {:>6} {:>6}",
            table.id,
            table.status.as_str(),
            table.capacity,
            tab
        );
    }
    out.trim_end().to_string()
}

fn render_history(ctx: Context<'_>, tabs: &[Tab]) -> String {
    if tabs.is_empty() {
        return "No closed tabs.".to_string();
    }

    let mut out = format!("{:<6} {:<6} {:<17} {:>12}\n", "TAB", "STAFF", "CLOSED", "TOTAL");
    for tab in tabs {
        let closed = tab
            .closed_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<6} {:<6} {:<17} {:>12}",
            tab.id,
            tab.staff_id,
            closed,
            ctx.money(tab.total_cents.unwrap_or(0))
        );
    }
    out.trim_end().to_string()
}
