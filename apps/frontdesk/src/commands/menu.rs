//! # Menu Commands

use comanda_core::{CoreError, MenuItem, NewMenuItem};
use std::fmt::Write;

use super::{or_dash, Context, Output};
use crate::cli::MenuCommand;
use crate::error::AppResult;

pub async fn run(ctx: Context<'_>, command: MenuCommand) -> AppResult<Output> {
    match command {
        MenuCommand::Add {
            description,
            price,
            sub,
        } => {
            let item = ctx
                .db
                .menu()
                .insert(&NewMenuItem {
                    description,
                    sub_description: sub,
                    price_cents: price.cents(),
                })
                .await?;
            let text = format!(
                "Added menu item {}: {} {}",
                item.id,
                item.description,
                ctx.money(item.price_cents)
            );
            Output::new(&item, text)
        }

        MenuCommand::List => {
            let items = ctx.db.menu().list().await?;
            let text = render_menu(ctx, &items);
            Output::new(&items, text)
        }

        MenuCommand::Edit {
            id,
            description,
            price,
            sub,
        } => {
            let current = ctx
                .db
                .menu()
                .get_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found("Menu item", id))?;

            let item = ctx
                .db
                .menu()
                .update(
                    id,
                    &NewMenuItem {
                        description: description.unwrap_or(current.description),
                        sub_description: sub.or(current.sub_description),
                        price_cents: price.map_or(current.price_cents, |p| p.cents()),
                    },
                )
                .await?;
            let text = format!(
                "Menu item {}: {} {}",
                item.id,
                item.description,
                ctx.money(item.price_cents)
            );
            Output::new(&item, text)
        }

        MenuCommand::Delete { id } => {
            ctx.db.menu().delete(id).await?;
            Output::new(&serde_json::json!({ "deleted": id }), format!("Deleted menu item {id}"))
        }
    }
}

fn render_menu(ctx: Context<'_>, items: &[MenuItem]) -> String {
    if items.is_empty() {
        return "Menu is empty.".to_string();
    }

    let mut out = format!("{:<5} {:<30} {:<30} {:>12}\n", "ID", "ITEM", "DETAIL", "PRICE");
    for item in items {
        let _ = writeln!(
            out,
            "{:<5} {:<30} {:<30} {:>12}",
            item.id,
            item.description,
            or_dash(item.sub_description.as_deref()),
            ctx.money(item.price_cents)
        );
    }
    out.trim_end().to_string()
}
