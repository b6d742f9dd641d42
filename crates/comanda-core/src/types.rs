//! # Domain Types
//!
//! Core domain types used throughout Comanda.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Table       │   │       Tab       │   │  TabLineItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  table_id       │◄──│  tab_id         │       │
//! │  │  status         │   │  staff_id       │   │  menu_item_id   │       │
//! │  │  capacity       │   │  opened_at      │   │  quantity       │       │
//! │  └─────────────────┘   │  closed_at?     │   │  unit_price ❄   │       │
//! │                        │  service_fee    │   │  description ❄  │       │
//! │  ┌─────────────────┐   │  total?         │   └─────────────────┘       │
//! │  │    MenuItem     │   └─────────────────┘          ❄ = frozen at      │
//! │  │  description    │                                   order time      │
//! │  │  price_cents    │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │     Staff       │   │    Customer     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Machines
//! ```text
//! Tab:    OPEN ──close_tab──► CLOSED   (terminal, immutable)
//!
//! Table:  free ──open_tab──► occupied ──close_tab──► free
//!         free ◄──manual edit──► reserved
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::DEFAULT_SERVICE_FEE_BPS;

// =============================================================================
// Service Fee Rate
// =============================================================================

/// Service fee rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 1000 bps = 10%, the house default.
/// Fractional percentages like 12.5% stay exact (1250 bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceFeeRate(u32);

impl ServiceFeeRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ServiceFeeRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for ServiceFeeRate {
    fn default() -> Self {
        ServiceFeeRate(DEFAULT_SERVICE_FEE_BPS)
    }
}

impl fmt::Display for ServiceFeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Table
// =============================================================================

/// Occupancy status of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Available for a new tab.
    Free,
    /// Has exactly one open tab.
    Occupied,
    /// Held by hand; no tab can be opened.
    Reserved,
}

impl TableStatus {
    /// All statuses, in display order.
    pub const ALL: [TableStatus; 3] = [
        TableStatus::Free,
        TableStatus::Occupied,
        TableStatus::Reserved,
    ];

    /// Storage / display name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Free => "free",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }

    /// Checks that `self` is a legal target for a manual table edit.
    ///
    /// Only `free` and `reserved` can be set by hand; `occupied` is owned
    /// by the tab lifecycle.
    pub fn ensure_manual_target(self, table_id: i64) -> CoreResult<()> {
        match self {
            TableStatus::Occupied => Err(CoreError::ManualStatusChange {
                table_id,
                requested: self,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Free
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(TableStatus::Free),
            "occupied" => Ok(TableStatus::Occupied),
            "reserved" => Ok(TableStatus::Reserved),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: TableStatus::ALL.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

/// A dining table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Table {
    pub id: i64,
    pub status: TableStatus,
    /// Number of seats.
    pub capacity: i64,
}

/// Input for creating a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTable {
    pub capacity: i64,
    /// Defaults to `free`; `occupied` is rejected.
    #[serde(default)]
    pub status: TableStatus,
}

/// A table together with the open tab seated at it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TableOverview {
    pub id: i64,
    pub status: TableStatus,
    pub capacity: i64,
    pub open_tab_id: Option<i64>,
}

// =============================================================================
// People
// =============================================================================

/// A staff member who opens and serves tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    /// Brazilian taxpayer id, 11 digits.
    pub cpf: String,
    pub name: String,
}

/// Input for creating a staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStaff {
    pub cpf: String,
    pub name: String,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub cpf: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Input for creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub cpf: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

// =============================================================================
// Menu
// =============================================================================

/// An item on the menu.
///
/// Editing `price_cents` never touches line items already on a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    /// Main label, e.g. "Frango Assado".
    pub description: String,
    /// Extra detail, e.g. "com batata frita".
    pub sub_description: Option<String>,
    /// Current price in cents.
    pub price_cents: i64,
}

impl MenuItem {
    /// Returns the current price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub description: String,
    pub sub_description: Option<String>,
    pub price_cents: i64,
}

// =============================================================================
// Tab
// =============================================================================

/// Derived lifecycle state of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Open,
    Closed,
}

/// A running bill for one table, served by one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tab {
    pub id: i64,
    pub staff_id: i64,
    pub table_id: i64,
    pub opened_at: DateTime<Utc>,
    /// `None` while the tab is open.
    pub closed_at: Option<DateTime<Utc>>,
    /// Service fee captured when the tab was opened.
    pub service_fee_bps: u32,
    /// Final total, written once at close.
    pub total_cents: Option<i64>,
}

impl Tab {
    /// Returns whether the tab is still accepting items.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Returns the derived lifecycle state.
    pub fn status(&self) -> TabStatus {
        if self.is_open() {
            TabStatus::Open
        } else {
            TabStatus::Closed
        }
    }

    /// Rejects operations on a closed tab.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CoreError::TabClosed { tab_id: self.id })
        }
    }

    /// Returns the service fee rate captured at open time.
    #[inline]
    pub fn service_fee(&self) -> ServiceFeeRate {
        ServiceFeeRate::from_bps(self.service_fee_bps)
    }

    /// Returns the final total, if the tab is closed.
    #[inline]
    pub fn total(&self) -> Option<Money> {
        self.total_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// One add-to-tab event. Insert-only.
///
/// Uses the snapshot pattern: price and description are copied from the
/// menu when the item is ordered, so later menu edits leave the bill alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TabLineItem {
    pub id: i64,
    pub tab_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    /// Unit price in cents at time of order (frozen).
    pub unit_price_cents: i64,
    /// Menu description at time of order (frozen).
    pub description_snapshot: String,
    pub ordered_at: DateTime<Utc>,
}

impl TabLineItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns `quantity × unit price`, or `None` if it leaves the i64 range.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_mul_quantity(self.quantity)
    }
}

/// Read-only projection of a line item for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemView {
    pub entry_id: i64,
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl TryFrom<&TabLineItem> for LineItemView {
    type Error = CoreError;

    fn try_from(item: &TabLineItem) -> CoreResult<Self> {
        let line_total = item.line_total().ok_or(CoreError::AmountOverflow {
            tab_id: item.tab_id,
        })?;

        Ok(LineItemView {
            entry_id: item.id,
            description: item.description_snapshot.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents: line_total.cents(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn open_tab() -> Tab {
        Tab {
            id: 10,
            staff_id: 1,
            table_id: 1,
            opened_at: Utc::now(),
            closed_at: None,
            service_fee_bps: 1000,
            total_cents: None,
        }
    }

    #[test]
    fn test_service_fee_rate() {
        let rate = ServiceFeeRate::from_bps(1250);
        assert_eq!(rate.bps(), 1250);
        assert_eq!(rate.to_string(), "12.50%");
        assert_eq!(ServiceFeeRate::default().bps(), 1000);
    }

    #[test]
    fn test_table_status_parse_and_display() {
        assert_eq!("Reserved".parse::<TableStatus>().unwrap(), TableStatus::Reserved);
        assert_eq!(TableStatus::Occupied.to_string(), "occupied");
        assert!("broken".parse::<TableStatus>().is_err());
        assert_eq!(TableStatus::default(), TableStatus::Free);
    }

    #[test]
    fn test_manual_edits_cannot_occupy() {
        assert!(TableStatus::Free.ensure_manual_target(1).is_ok());
        assert!(TableStatus::Reserved.ensure_manual_target(1).is_ok());
        assert!(TableStatus::Occupied.ensure_manual_target(1).is_err());
    }

    #[test]
    fn test_tab_state() {
        let mut tab = open_tab();
        assert_eq!(tab.status(), TabStatus::Open);
        assert!(tab.ensure_open().is_ok());
        assert_eq!(tab.service_fee(), ServiceFeeRate::default());
        assert_eq!(tab.total(), None);

        tab.closed_at = Some(Utc::now());
        tab.total_cents = Some(6050);
        assert_eq!(tab.status(), TabStatus::Closed);
        assert!(matches!(
            tab.ensure_open(),
            Err(CoreError::TabClosed { tab_id: 10 })
        ));
        assert_eq!(tab.total(), Some(Money::from_cents(6050)));
    }

    #[test]
    fn test_line_item_view() {
        let item = TabLineItem {
            id: 3,
            tab_id: 10,
            menu_item_id: 5,
            quantity: 2,
            unit_price_cents: 2000,
            description_snapshot: "Moqueca".to_string(),
            ordered_at: Utc::now(),
        };
        let view = LineItemView::try_from(&item).unwrap();
        assert_eq!(view.entry_id, 3);
        assert_eq!(view.line_total_cents, 4000);
        assert_eq!(view.description, "Moqueca");
    }

    #[test]
    fn test_line_item_view_reports_overflow() {
        let item = TabLineItem {
            id: 4,
            tab_id: 10,
            menu_item_id: 5,
            quantity: 3,
            unit_price_cents: i64::MAX / 2,
            description_snapshot: "Lagosta".to_string(),
            ordered_at: Utc::now(),
        };
        assert_eq!(item.line_total(), None);

        let err = LineItemView::try_from(&item).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { tab_id: 10 }));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn test_table_status_serde() {
        let json = serde_json::to_string(&TableStatus::Reserved).unwrap();
        assert_eq!(json, "\"reserved\"");
    }
}
