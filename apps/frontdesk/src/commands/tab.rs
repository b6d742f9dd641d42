//! # Tab Commands
//!
//! The front desk's main screen: open a tab, add items, check the bill,
//! close it.

use comanda_core::{CoreError, LineItemView, Tab, TabTotals};
use serde::Serialize;
use std::fmt::Write;

use super::{Context, Output};
use crate::cli::TabCommand;
use crate::error::AppResult;

/// `tab show` payload.
#[derive(Debug, Serialize)]
struct TabDetail {
    tab: Tab,
    items: Vec<LineItemView>,
    totals: TabTotals,
}

/// `tab add` payload.
#[derive(Debug, Serialize)]
struct Appended {
    tab_id: i64,
    entry_id: i64,
}

pub async fn run(ctx: Context<'_>, command: TabCommand) -> AppResult<Output> {
    match command {
        TabCommand::Open { staff, table } => {
            let tab = ctx.db.tabs().open_tab(staff, table).await?;
            let text = format!(
                "Opened tab {} on table {} (service fee {})",
                tab.id,
                tab.table_id,
                tab.service_fee()
            );
            Output::new(&tab, text)
        }

        TabCommand::Add { tab, item, qty } => {
            let entry_id = ctx.db.ledger().append_item(tab, item, qty).await?;
            let text = format!("Added {qty} × item {item} to tab {tab} (entry {entry_id})");
            Output::new(&Appended { tab_id: tab, entry_id }, text)
        }

        TabCommand::Items { tab } => {
            let items = ctx.db.ledger().list_items(tab).await?;
            let text = render_items(ctx, &items);
            Output::new(&items, text)
        }

        TabCommand::Totals { tab } => {
            let totals = ctx.db.tabs().compute_totals(tab).await?;
            let text = render_totals(ctx, &totals);
            Output::new(&totals, text)
        }

        TabCommand::Close { tab } => {
            let closed = ctx.db.tabs().close_tab(tab).await?;
            let text = format!(
                "Closed tab {} at {}, table {} is free\n{}",
                tab,
                closed.closed_at.format("%Y-%m-%d %H:%M"),
                closed.totals.table_id,
                render_totals(ctx, &closed.totals)
            );
            Output::new(&closed, text)
        }

        TabCommand::List => {
            let tabs = ctx.db.tabs().list_open().await?;
            let text = render_open_tabs(&tabs);
            Output::new(&tabs, text)
        }

        TabCommand::Show { tab: tab_id } => {
            let tab = ctx
                .db
                .tabs()
                .get_by_id(tab_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Tab", tab_id))?;
            let items = ctx.db.ledger().list_items(tab_id).await?;
            let totals = ctx.db.tabs().compute_totals(tab_id).await?;

            let status = if tab.is_open() { "open" } else { "closed" };
            let text = format!(
                "Tab {} · table {} · staff {} · {} since {}\n\n{}\n{}",
                tab.id,
                tab.table_id,
                tab.staff_id,
                status,
                tab.opened_at.format("%Y-%m-%d %H:%M"),
                render_items(ctx, &items),
                render_totals(ctx, &totals)
            );
            Output::new(&TabDetail { tab, items, totals }, text)
        }
    }
}

fn render_items(ctx: Context<'_>, items: &[LineItemView]) -> String {
    if items.is_empty() {
        return "No items.".to_string();
    }

    let mut out = format!(
        "{:<6} {:<30} {:>4} {:>12} {:>12}\n",
        "ENTRY", "ITEM", "QTY", "UNIT", "TOTAL"
    );
    for item in items {
        let _ = writeln!(
            out,
            "{:<6} {:<30} {:>4} {:>12} {:>12}",
            item.entry_id,
            item.description,
            item.quantity,
            ctx.money(item.unit_price_cents),
            ctx.money(item.line_total_cents)
        );
    }
    out.trim_end().to_string()
}

fn render_totals(ctx: Context<'_>, totals: &TabTotals) -> String {
    let fee_label = format!("Service fee ({})", totals.service_fee());
    format!(
        "{:<22} {:>12}\n{:<22} {:>12}\n{:<22} {:>12}",
        "Subtotal",
        ctx.money(totals.subtotal_cents),
        fee_label,
        ctx.money(totals.fee_cents),
        "Total",
        ctx.money(totals.total_cents)
    )
}

fn render_open_tabs(tabs: &[Tab]) -> String {
    if tabs.is_empty() {
        return "No open tabs.".to_string();
    }

    let mut out = format!("{:<6} {:<6} {:<6} {}\n", "TAB", "TABLE", "STAFF", "OPENED");
    for tab in tabs {
        let _ = writeln!(
            out,
            "{:<6} {:<6} {:<6} {}",
            tab.id,
            tab.table_id,
            tab.staff_id,
            tab.opened_at.format("%Y-%m-%d %H:%M")
        );
    }
    out.trim_end().to_string()
}
