//! # Customer Commands

use comanda_core::{CoreError, Customer, NewCustomer};
use std::fmt::Write;

use super::{or_dash, Context, Output};
use crate::cli::CustomerCommand;
use crate::error::AppResult;

pub async fn run(ctx: Context<'_>, command: CustomerCommand) -> AppResult<Output> {
    match command {
        CustomerCommand::Add { cpf, name, phone } => {
            let customer = ctx
                .db
                .customers()
                .insert(&NewCustomer { cpf, name, phone })
                .await?;
            let text = format!(
                "Registered customer {}: {}",
                customer.id,
                or_dash(customer.name.as_deref())
            );
            Output::new(&customer, text)
        }

        CustomerCommand::List => {
            let customers = ctx.db.customers().list().await?;
            let text = render_customers(&customers);
            Output::new(&customers, text)
        }

        CustomerCommand::Edit {
            id,
            cpf,
            name,
            phone,
        } => {
            let current = ctx
                .db
                .customers()
                .get_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found("Customer", id))?;

            let customer = ctx
                .db
                .customers()
                .update(
                    id,
                    &NewCustomer {
                        cpf: cpf.unwrap_or(current.cpf),
                        name: name.or(current.name),
                        phone: phone.or(current.phone),
                    },
                )
                .await?;
            let text = format!(
                "Customer {}: {} ({})",
                customer.id,
                or_dash(customer.name.as_deref()),
                customer.cpf
            );
            Output::new(&customer, text)
        }

        CustomerCommand::Delete { id } => {
            ctx.db.customers().delete(id).await?;
            Output::new(&serde_json::json!({ "deleted": id }), format!("Deleted customer {id}"))
        }
    }
}

fn render_customers(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers registered.".to_string();
    }

    let mut out = format!("{:<5} {:<12} {:<15} {}\n", "ID", "CPF", "PHONE", "NAME");
    for c in customers {
        let _ = writeln!(
            out,
            "{:<5} {:<12} {:<15} {}",
            c.id,
            c.cpf,
            or_dash(c.phone.as_deref()),
            or_dash(c.name.as_deref())
        );
    }
    out.trim_end().to_string()
}
