//! # Staff Commands

use comanda_core::{CoreError, NewStaff, Staff};
use std::fmt::Write;

use super::{Context, Output};
use crate::cli::StaffCommand;
use crate::error::AppResult;

pub async fn run(ctx: Context<'_>, command: StaffCommand) -> AppResult<Output> {
    match command {
        StaffCommand::Add { cpf, name } => {
            let staff = ctx.db.staff().insert(&NewStaff { cpf, name }).await?;
            let text = format!("Registered staff {}: {}", staff.id, staff.name);
            Output::new(&staff, text)
        }

        StaffCommand::List => {
            let staff = ctx.db.staff().list().await?;
            let text = render_staff(&staff);
            Output::new(&staff, text)
        }

        StaffCommand::Edit { id, cpf, name } => {
            let current = ctx
                .db
                .staff()
                .get_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found("Staff", id))?;

            let staff = ctx
                .db
                .staff()
                .update(
                    id,
                    &NewStaff {
                        cpf: cpf.unwrap_or(current.cpf),
                        name: name.unwrap_or(current.name),
                    },
                )
                .await?;
            let text = format!("Staff {}: {} ({})", staff.id, staff.name, staff.cpf);
            Output::new(&staff, text)
        }

        StaffCommand::Delete { id } => {
            ctx.db.staff().delete(id).await?;
            Output::new(&serde_json::json!({ "deleted": id }), format!("Deleted staff {id}"))
        }
    }
}

fn render_staff(staff: &[Staff]) -> String {
    if staff.is_empty() {
        return "No staff registered.".to_string();
    }

    let mut out = format!("{:<5} {:<12} {}\n", "ID", "CPF", "NAME");
    for s in staff {
        let _ = writeln!(out, "{:<5} {:<12} {}", s.id, s.cpf, s.name);
    }
    out.trim_end().to_string()
}
