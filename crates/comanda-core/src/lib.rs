//! # comanda-core: Pure Business Logic for Comanda
//!
//! Domain rules for restaurant tabs ("comandas"): money, service fees,
//! table/tab state rules, billing and input validation. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Comanda Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    frontdesk (CLI)                              │   │
//! │  │    tab open ──► tab add ──► tab totals ──► tab close           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               comanda-db (Database Layer)                       │   │
//! │  │      transactions, lifecycle, ledger, record store              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ pure calls                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comanda-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  billing  │  │ validation│  │   │
//! │  │   │ Tab Table │  │   Money   │  │ TabTotals │  │   rules   │  │   │
//! │  │   │ MenuItem  │  │ FeeRate   │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Table, Tab, MenuItem, line items, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`billing`] - Subtotal / service fee / total calculation
//! - [`error`] - Domain error types and the error taxonomy
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use comanda_core::money::Money;
//! use comanda_core::types::ServiceFeeRate;
//!
//! let subtotal = Money::from_cents(5500); // 55.00
//! let fee = subtotal.service_fee(ServiceFeeRate::default()); // 10%
//!
//! assert_eq!(fee.cents(), 550);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{compute_totals, ClosedTab, TabTotals};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Service fee applied to new tabs unless configured otherwise: 10%.
pub const DEFAULT_SERVICE_FEE_BPS: u32 = 1000;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Catches typos at the counter (1000 instead of 10) and keeps
/// `quantity × price` far away from overflow.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum menu price in cents: 1,000,000.00.
///
/// With [`MAX_ITEM_QUANTITY`] this bounds a single line well inside i64.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum seats at a single table.
pub const MAX_TABLE_CAPACITY: i64 = 100;
