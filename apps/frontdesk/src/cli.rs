//! # Command Line
//!
//! The explicit command registry: every front desk screen is a variant here.
//!
//! ```text
//! frontdesk [--db PATH] [--service-fee-bps N] [--currency SYM] [--json] <COMMAND>
//!
//!   tab       open | add | items | totals | close | list | show
//!   table     add | list | edit | history | delete
//!   menu      add | list | edit | delete
//!   staff     add | list | edit | delete
//!   customer  add | list | edit | delete
//!   status
//! ```

use clap::{Args, Parser, Subcommand};
use comanda_core::{Money, TableStatus};
use std::path::PathBuf;

/// Comanda front desk: tables, menu, staff and tabs.
#[derive(Parser, Debug)]
#[command(name = "frontdesk", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// SQLite database file.
    #[arg(long, global = true, env = "COMANDA_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Service fee for newly opened tabs, in basis points (1000 = 10%).
    #[arg(long, global = true, env = "COMANDA_SERVICE_FEE_BPS")]
    pub service_fee_bps: Option<u32>,

    /// Currency symbol for amounts.
    #[arg(long, global = true, env = "COMANDA_CURRENCY_SYMBOL")]
    pub currency: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open, fill and close tabs.
    #[command(subcommand)]
    Tab(TabCommand),
    /// Manage dining tables.
    #[command(subcommand)]
    Table(TableCommand),
    /// Manage the menu.
    #[command(subcommand)]
    Menu(MenuCommand),
    /// Manage staff.
    #[command(subcommand)]
    Staff(StaffCommand),
    /// Manage customers.
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// Show database location, health and open tab count.
    Status,
}

#[derive(Subcommand, Debug)]
pub enum TabCommand {
    /// Open a tab on a free table.
    Open {
        #[arg(long)]
        staff: i64,
        #[arg(long)]
        table: i64,
    },
    /// Add a menu item to an open tab.
    Add {
        tab: i64,
        #[arg(long)]
        item: i64,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },
    /// List a tab's line items.
    Items { tab: i64 },
    /// Show subtotal, service fee and total.
    Totals { tab: i64 },
    /// Close a tab and free its table.
    Close { tab: i64 },
    /// List open tabs.
    List,
    /// Show a tab with its items and totals.
    Show { tab: i64 },
}

#[derive(Subcommand, Debug)]
pub enum TableCommand {
    /// Add a table.
    Add {
        #[arg(long)]
        capacity: i64,
        /// Start reserved instead of free.
        #[arg(long)]
        reserved: bool,
    },
    /// List tables with their open tab.
    List,
    /// Change capacity or set free/reserved.
    Edit {
        id: i64,
        #[arg(long)]
        capacity: Option<i64>,
        #[arg(long)]
        status: Option<TableStatus>,
    },
    /// Closed tabs served at a table, most recent first.
    History { id: i64 },
    /// Delete a table.
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum MenuCommand {
    /// Add a menu item.
    Add {
        description: String,
        /// Price, e.g. 20.00 or 20,00.
        #[arg(long)]
        price: Money,
        #[arg(long)]
        sub: Option<String>,
    },
    /// List the menu.
    List,
    /// Edit a menu item; omitted fields keep their value.
    Edit {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long)]
        sub: Option<String>,
    },
    /// Delete a menu item.
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum StaffCommand {
    /// Register a staff member.
    Add {
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        name: String,
    },
    /// List staff.
    List,
    /// Edit a staff member; omitted fields keep their value.
    Edit {
        id: i64,
        #[arg(long)]
        cpf: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a staff member.
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// Register a customer.
    Add {
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List customers.
    List,
    /// Edit a customer; omitted fields keep their value.
    Edit {
        id: i64,
        #[arg(long)]
        cpf: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer.
    Delete { id: i64 },
}
