//! # Repository Module
//!
//! Database repository implementations for Comanda.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  frontdesk command                                                     │
//! │       │                                                                 │
//! │       │  db.tabs().close_tab(12)                                       │
//! │       ▼                                                                 │
//! │  TabRepository                                                         │
//! │  ├── open_tab / close_tab        one transaction each                  │
//! │  ├── compute_totals              read-only                             │
//! │  └── get_by_id / list_open                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! Lifecycle operations issue their guarding write (a conditional UPDATE or
//! INSERT ... SELECT) as the first statement of the transaction. SQLite then
//! takes the write lock before any snapshot is read, so a second writer
//! waits on the busy timeout and re-evaluates the guard instead of failing.
//! Every early `return` drops the transaction, which rolls it back.
//!
//! ## Available Repositories
//!
//! - [`TabRepository`](tab::TabRepository) - Tab lifecycle and billing
//! - [`LedgerRepository`](ledger::LedgerRepository) - Line item entries
//! - [`TableRepository`](table::TableRepository) - Dining tables
//! - [`MenuRepository`](menu::MenuRepository) - Menu items
//! - [`StaffRepository`](staff::StaffRepository) - Staff
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers

pub mod customer;
pub mod ledger;
pub mod menu;
pub mod staff;
pub mod tab;
pub mod table;
