//! # Tab Repository
//!
//! Tab lifecycle: open, bill, close.
//!
//! ## Tab Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tab Lifecycle                                    │
//! │                                                                         │
//! │  1. OPEN                                         (one transaction)     │
//! │     └── claim table: free → occupied   (conditional UPDATE)            │
//! │     └── staff must exist                                               │
//! │     └── INSERT tab { fee captured from config }                        │
//! │                                                                         │
//! │  2. ADD ITEMS                                    (LedgerRepository)    │
//! │     └── append_item() × N, price frozen per entry                      │
//! │                                                                         │
//! │  3. TOTALS (any time)                            (read only)           │
//! │     └── compute_totals() → subtotal, fee, total                        │
//! │                                                                         │
//! │  4. CLOSE                                        (one transaction)     │
//! │     └── claim tab: closed_at IS NULL → now   (conditional UPDATE)      │
//! │     └── reject empty tab                                               │
//! │     └── write total, table occupied → free                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use comanda_core::validation::validate_id;
use comanda_core::{
    compute_totals, ClosedTab, CoreError, ServiceFeeRate, Tab, TabLineItem, TabTotals, TableStatus,
};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Repository for the tab lifecycle.
#[derive(Debug, Clone)]
pub struct TabRepository {
    pool: SqlitePool,
    default_service_fee: ServiceFeeRate,
}

impl TabRepository {
    /// Creates a new TabRepository; opened tabs capture `default_service_fee`.
    pub fn new(pool: SqlitePool, default_service_fee: ServiceFeeRate) -> Self {
        TabRepository {
            pool,
            default_service_fee,
        }
    }

    /// Opens a tab for `staff_id` on `table_id`.
    ///
    /// ## Preconditions
    /// - Table exists and is `free` (`NotFound` / `StateConflict`)
    /// - Staff member exists (`NotFound`)
    ///
    /// On success the table is `occupied` and the new tab is open. On any
    /// failure nothing is committed and the table keeps its status.
    pub async fn open_tab(&self, staff_id: i64, table_id: i64) -> ServiceResult<Tab> {
        validate_id("staff_id", staff_id)?;
        validate_id("table_id", table_id)?;

        debug!(staff_id, table_id, "Opening tab");

        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"UPDATE "table" SET status = 'occupied' WHERE id = ?1 AND status = 'free'"#,
        )
        .bind(table_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            let status: Option<TableStatus> =
                sqlx::query_scalar(r#"SELECT status FROM "table" WHERE id = ?1"#)
                    .bind(table_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let err = match status {
                None => CoreError::not_found("Table", table_id),
                Some(status) => CoreError::TableNotFree { table_id, status },
            };
            warn!(table_id, error = %err, "Open tab rejected");
            return Err(err.into());
        }

        let staff: Option<i64> = sqlx::query_scalar("SELECT id FROM staff WHERE id = ?1")
            .bind(staff_id)
            .fetch_optional(&mut *tx)
            .await?;

        if staff.is_none() {
            warn!(staff_id, table_id, "Open tab rejected: unknown staff");
            return Err(CoreError::not_found("Staff", staff_id).into());
        }

        let tab = sqlx::query_as::<_, Tab>(
            r#"
            INSERT INTO tab (staff_id, table_id, opened_at, service_fee_bps)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, staff_id, table_id, opened_at, closed_at, service_fee_bps, total_cents
            "#,
        )
        .bind(staff_id)
        .bind(table_id)
        .bind(Utc::now())
        .bind(self.default_service_fee.bps())
        .fetch_one(&mut *tx)
        .await?;

        commit(tx, "open_tab").await?;

        info!(
            tab_id = tab.id,
            table_id,
            staff_id,
            service_fee = %tab.service_fee(),
            "Tab opened"
        );

        Ok(tab)
    }

    /// Closes an open tab.
    ///
    /// ## What This Does
    /// 1. Marks the tab closed (fails if already closed)
    /// 2. Rejects a tab with no line items
    /// 3. Computes and stores the final total
    /// 4. Frees the table
    ///
    /// All four happen in one transaction; any failure commits nothing.
    pub async fn close_tab(&self, tab_id: i64) -> ServiceResult<ClosedTab> {
        validate_id("tab_id", tab_id)?;

        debug!(tab_id, "Closing tab");

        let closed_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        let claimed =
            sqlx::query("UPDATE tab SET closed_at = ?2 WHERE id = ?1 AND closed_at IS NULL")
                .bind(tab_id)
                .bind(closed_at)
                .execute(&mut *tx)
                .await?;

        if claimed.rows_affected() == 0 {
            // Either missing (NotFound) or already closed.
            let tab = fetch_tab(&mut tx, tab_id).await?;
            let err = CoreError::TabClosed { tab_id: tab.id };
            warn!(tab_id, error = %err, "Close tab rejected");
            return Err(err.into());
        }

        let tab = fetch_tab(&mut tx, tab_id).await?;
        let items = fetch_items(&mut tx, tab_id).await?;

        if items.is_empty() {
            let err = CoreError::EmptyTab { tab_id };
            warn!(tab_id, error = %err, "Close tab rejected");
            return Err(err.into());
        }

        let totals = compute_totals(&tab, &items)?;

        sqlx::query("UPDATE tab SET total_cents = ?2 WHERE id = ?1")
            .bind(tab_id)
            .bind(totals.total_cents)
            .execute(&mut *tx)
            .await?;

        sqlx::query(r#"UPDATE "table" SET status = 'free' WHERE id = ?1"#)
            .bind(tab.table_id)
            .execute(&mut *tx)
            .await?;

        commit(tx, "close_tab").await?;

        info!(
            tab_id,
            table_id = tab.table_id,
            subtotal_cents = totals.subtotal_cents,
            fee_cents = totals.fee_cents,
            total_cents = totals.total_cents,
            "Tab closed"
        );

        Ok(ClosedTab { totals, closed_at })
    }

    /// Computes subtotal, service fee and total for a tab, open or closed.
    ///
    /// Empty tabs produce a zero bill. Nothing is written.
    pub async fn compute_totals(&self, tab_id: i64) -> ServiceResult<TabTotals> {
        debug!(tab_id, "Computing totals");

        let mut conn = self.pool.acquire().await?;
        let tab = fetch_tab(&mut conn, tab_id).await?;
        let items = fetch_items(&mut conn, tab_id).await?;

        Ok(compute_totals(&tab, &items)?)
    }

    /// Gets a tab by ID.
    pub async fn get_by_id(&self, tab_id: i64) -> ServiceResult<Option<Tab>> {
        let tab = sqlx::query_as::<_, Tab>(
            r#"
            SELECT id, staff_id, table_id, opened_at, closed_at, service_fee_bps, total_cents
            FROM tab
            WHERE id = ?1
            "#,
        )
        .bind(tab_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tab)
    }

    /// Lists open tabs, oldest first.
    pub async fn list_open(&self) -> ServiceResult<Vec<Tab>> {
        let tabs = sqlx::query_as::<_, Tab>(
            r#"
            SELECT id, staff_id, table_id, opened_at, closed_at, service_fee_bps, total_cents
            FROM tab
            WHERE closed_at IS NULL
            ORDER BY opened_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tabs)
    }

    /// Lists closed tabs for a table, most recent first.
    pub async fn history_for_table(&self, table_id: i64) -> ServiceResult<Vec<Tab>> {
        let tabs = sqlx::query_as::<_, Tab>(
            r#"
            SELECT id, staff_id, table_id, opened_at, closed_at, service_fee_bps, total_cents
            FROM tab
            WHERE table_id = ?1 AND closed_at IS NOT NULL
            ORDER BY closed_at DESC, id DESC
            "#,
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tabs)
    }
}

// =============================================================================
// Shared Queries
// =============================================================================

/// Fetches a tab, mapping a missing row to `NotFound`.
pub(crate) async fn fetch_tab(conn: &mut SqliteConnection, tab_id: i64) -> ServiceResult<Tab> {
    sqlx::query_as::<_, Tab>(
        r#"
        SELECT id, staff_id, table_id, opened_at, closed_at, service_fee_bps, total_cents
        FROM tab
        WHERE id = ?1
        "#,
    )
    .bind(tab_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| CoreError::not_found("Tab", tab_id).into())
}

/// Fetches a tab's line items in insertion order.
pub(crate) async fn fetch_items(
    conn: &mut SqliteConnection,
    tab_id: i64,
) -> ServiceResult<Vec<TabLineItem>> {
    let items = sqlx::query_as::<_, TabLineItem>(
        r#"
        SELECT id, tab_id, menu_item_id, quantity, unit_price_cents,
               description_snapshot, ordered_at
        FROM tab_line_item
        WHERE tab_id = ?1
        ORDER BY id
        "#,
    )
    .bind(tab_id)
    .fetch_all(conn)
    .await?;

    Ok(items)
}

/// Commits, logging storage failures with the operation name.
pub(crate) async fn commit(
    tx: sqlx::Transaction<'_, sqlx::Sqlite>,
    operation: &'static str,
) -> ServiceResult<()> {
    tx.commit().await.map_err(|e| {
        let err = ServiceError::from(e);
        error!(operation, error = %err, "Commit failed, transaction rolled back");
        err
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
