//! # Ledger Repository
//!
//! Line item entries: one row per add-to-tab event, insert-only.
//!
//! ## Snapshot Pattern
//! The menu item's current price and description are copied onto the entry
//! by the INSERT itself. Later menu edits never change what a tab owes.

use chrono::Utc;
use comanda_core::validation::{validate_id, validate_quantity};
use comanda_core::{compute_totals, CoreError, LineItemView, ValidationError};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::tab::{commit, fetch_items, fetch_tab};
use crate::error::ServiceResult;

/// Repository for line item entries.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Appends `quantity` × menu item to an open tab, freezing the price.
    ///
    /// ## Checks (in order)
    /// 1. `quantity` in 1..=999 (`Validation`, before any lookup)
    /// 2. Tab exists (`NotFound`) and is open (`StateConflict`)
    /// 3. Menu item exists (`NotFound`)
    /// 4. The tab can still be billed with the new entry (`Validation`)
    ///
    /// ## Returns
    /// The new entry id. The tab's stored total is never touched.
    pub async fn append_item(
        &self,
        tab_id: i64,
        menu_item_id: i64,
        quantity: i64,
    ) -> ServiceResult<i64> {
        validate_quantity(quantity)?;
        validate_id("tab_id", tab_id)?;
        validate_id("menu_item_id", menu_item_id)?;

        debug!(tab_id, menu_item_id, quantity, "Appending line item");

        let mut tx = self.pool.begin().await?;

        // Inserts only when the tab is open and the item exists.
        let entry_id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO tab_line_item (
                tab_id, menu_item_id, quantity,
                unit_price_cents, description_snapshot, ordered_at
            )
            SELECT t.id, m.id, ?3, m.price_cents, m.description, ?4
            FROM tab t, menu_item m
            WHERE t.id = ?1 AND t.closed_at IS NULL AND m.id = ?2
            RETURNING id
            "#,
        )
        .bind(tab_id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entry_id) = entry_id else {
            let tab = fetch_tab(&mut tx, tab_id).await?;
            let err = match tab.ensure_open() {
                Err(closed) => closed,
                Ok(()) => CoreError::not_found("Menu item", menu_item_id),
            };
            warn!(tab_id, menu_item_id, error = %err, "Append rejected");
            return Err(err.into());
        };

        // A tab that cannot be totalled could never be closed.
        let tab = fetch_tab(&mut tx, tab_id).await?;
        let items = fetch_items(&mut tx, tab_id).await?;
        if compute_totals(&tab, &items).is_err() {
            let err = ValidationError::AmountTooLarge {
                field: "quantity".to_string(),
            };
            warn!(tab_id, menu_item_id, quantity, error = %err, "Append rejected");
            return Err(err.into());
        }

        commit(tx, "append_item").await?;

        info!(tab_id, menu_item_id, quantity, entry_id, "Line item appended");

        Ok(entry_id)
    }

    /// Lists a tab's entries in insertion order.
    ///
    /// Works for open and closed tabs; `NotFound` if the tab doesn't exist,
    /// `StateConflict` if a stored entry's line total leaves the i64 range.
    pub async fn list_items(&self, tab_id: i64) -> ServiceResult<Vec<LineItemView>> {
        let mut conn = self.pool.acquire().await?;

        fetch_tab(&mut conn, tab_id).await?;
        let items = fetch_items(&mut conn, tab_id).await?;

        let views = items
            .iter()
            .map(LineItemView::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(views)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, ServiceError};
    use comanda_core::{
        CoreError, ErrorKind, MenuItem, NewMenuItem, NewStaff, NewTable, Tab, TableStatus,
    };

    async fn setup() -> (Database, Tab, MenuItem) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let staff = db
            .staff()
            .insert(&NewStaff {
                cpf: "98765432100".to_string(),
                name: "Bruno".to_string(),
            })
            .await
            .unwrap();
        let table = db
            .tables()
            .insert(&NewTable {
                capacity: 2,
                status: TableStatus::Free,
            })
            .await
            .unwrap();
        let item = db
            .menu()
            .insert(&NewMenuItem {
                description: "Acarajé".to_string(),
                sub_description: Some("com vatapá".to_string()),
                price_cents: 1200,
            })
            .await
            .unwrap();
        let tab = db.tabs().open_tab(staff.id, table.id).await.unwrap();
        (db, tab, item)
    }

    #[tokio::test]
    async fn test_append_and_list_in_order() {
        let (db, tab, item) = setup().await;

        let first = db.ledger().append_item(tab.id, item.id, 2).await.unwrap();
        let second = db.ledger().append_item(tab.id, item.id, 1).await.unwrap();
        assert!(second > first);

        let items = db.ledger().list_items(tab.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].entry_id, first);
        assert_eq!(items[0].description, "Acarajé");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].line_total_cents, 2400);
        assert_eq!(items[1].line_total_cents, 1200);
    }

    #[tokio::test]
    async fn test_validation_runs_before_lookup() {
        let (db, _, _) = setup().await;

        // Unknown tab and item, but the quantity is reported first.
        let err = db.ledger().append_item(999, 999, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_tab_and_menu_item() {
        let (db, tab, item) = setup().await;

        let err = db.ledger().append_item(tab.id + 100, item.id, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::NotFound { entity: "Tab", .. })
        ));

        let err = db.ledger().append_item(tab.id, item.id + 100, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::NotFound { entity: "Menu item", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_items_unknown_tab() {
        let (db, _, _) = setup().await;

        let err = db.ledger().list_items(12345).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
