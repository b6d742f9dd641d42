//! # Billing
//!
//! Derives a tab's subtotal, service fee and total from its ledger.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line items (prices frozen at order time)                               │
//! │    2 × 20.00 = 40.00                                                   │
//! │    1 × 15.00 = 15.00                                                   │
//! │                 ─────                                                   │
//! │  subtotal       55.00   exact, integer cents                           │
//! │  fee (10%)       5.50   rounded half-up, once                          │
//! │                 ─────                                                   │
//! │  total          60.50                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are always derived, never cached on write; only `close_tab`
//! persists the final figure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ServiceFeeRate, Tab, TabLineItem};

/// Bill breakdown for one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabTotals {
    pub tab_id: i64,
    pub table_id: i64,
    pub subtotal_cents: i64,
    pub service_fee_bps: u32,
    pub fee_cents: i64,
    pub total_cents: i64,
}

impl TabTotals {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn fee_amount(&self) -> Money {
        Money::from_cents(self.fee_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn service_fee(&self) -> ServiceFeeRate {
        ServiceFeeRate::from_bps(self.service_fee_bps)
    }
}

/// Result of a successful close: what was billed and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedTab {
    pub totals: TabTotals,
    pub closed_at: DateTime<Utc>,
}

/// Computes the bill for `tab` from its line items.
///
/// An empty ledger yields a zero bill; whether a zero bill may be closed is
/// the caller's decision. Items belonging to other tabs are a caller bug and
/// are not filtered here.
///
/// ## Errors
/// [`CoreError::AmountOverflow`] if accumulation leaves the i64 range.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use comanda_core::{compute_totals, Tab, TabLineItem};
///
/// let tab = Tab {
///     id: 10, staff_id: 1, table_id: 1,
///     opened_at: Utc::now(), closed_at: None,
///     service_fee_bps: 1000, total_cents: None,
/// };
/// let item = |id, qty, cents| TabLineItem {
///     id, tab_id: 10, menu_item_id: id, quantity: qty,
///     unit_price_cents: cents, description_snapshot: String::new(),
///     ordered_at: Utc::now(),
/// };
///
/// let totals = compute_totals(&tab, &[item(1, 2, 2000), item(2, 1, 1500)]).unwrap();
/// assert_eq!(totals.subtotal_cents, 5500);
/// assert_eq!(totals.fee_cents, 550);
/// assert_eq!(totals.total_cents, 6050);
/// ```
pub fn compute_totals(tab: &Tab, items: &[TabLineItem]) -> CoreResult<TabTotals> {
    let overflow = || CoreError::AmountOverflow { tab_id: tab.id };

    let subtotal = items.iter().try_fold(Money::zero(), |acc, item| {
        item.line_total().and_then(|line| acc.checked_add(line))
    });
    let subtotal = subtotal.ok_or_else(overflow)?;

    let rate = tab.service_fee();
    let fee = subtotal.service_fee(rate);
    let total = subtotal.checked_add(fee).ok_or_else(overflow)?;

    Ok(TabTotals {
        tab_id: tab.id,
        table_id: tab.table_id,
        subtotal_cents: subtotal.cents(),
        service_fee_bps: rate.bps(),
        fee_cents: fee.cents(),
        total_cents: total.cents(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tab(fee_bps: u32) -> Tab {
        Tab {
            id: 10,
            staff_id: 1,
            table_id: 1,
            opened_at: Utc::now(),
            closed_at: None,
            service_fee_bps: fee_bps,
            total_cents: None,
        }
    }

    fn item(id: i64, quantity: i64, unit_price_cents: i64) -> TabLineItem {
        TabLineItem {
            id,
            tab_id: 10,
            menu_item_id: id,
            quantity,
            unit_price_cents,
            description_snapshot: format!("item {id}"),
            ordered_at: Utc::now(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let totals = compute_totals(&tab(1000), &[item(1, 2, 2000), item(2, 1, 1500)]).unwrap();

        assert_eq!(totals.subtotal(), Money::from_cents(5500));
        assert_eq!(totals.fee_amount(), Money::from_cents(550));
        assert_eq!(totals.total(), Money::from_cents(6050));
        assert_eq!(totals.table_id, 1);
        assert_eq!(totals.service_fee(), ServiceFeeRate::default());
    }

    #[test]
    fn test_empty_tab_is_a_zero_bill() {
        let totals = compute_totals(&tab(1000), &[]).unwrap();
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.fee_cents, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_uses_rate_stored_on_tab() {
        let totals = compute_totals(&tab(1250), &[item(1, 1, 10000)]).unwrap();
        assert_eq!(totals.fee_cents, 1250);
        assert_eq!(totals.total_cents, 11250);

        let no_fee = compute_totals(&tab(0), &[item(1, 1, 10000)]).unwrap();
        assert_eq!(no_fee.total_cents, 10000);
    }

    #[test]
    fn test_many_small_lines_do_not_drift() {
        let items: Vec<_> = (0..1000).map(|i| item(i, 1, 10)).collect();
        let totals = compute_totals(&tab(1000), &items).unwrap();
        assert_eq!(totals.subtotal_cents, 10_000);
        assert_eq!(totals.fee_cents, 1_000);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = compute_totals(&tab(1000), &[item(1, 2, i64::MAX)]).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow { tab_id: 10 }));
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }
}
