//! # Table Repository
//!
//! Dining tables: create, list, edit and delete.
//!
//! Occupancy (`occupied`) belongs to the tab lifecycle. Manual edits may only
//! move a table between `free` and `reserved`, and never while a tab is open.

use comanda_core::validation::validate_capacity;
use comanda_core::{CoreError, NewTable, Table, TableOverview, TableStatus};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::tab::commit;
use crate::error::ServiceResult;

/// Repository for dining tables.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Creates a table. `occupied` is rejected: only opening a tab occupies.
    pub async fn insert(&self, table: &NewTable) -> ServiceResult<Table> {
        validate_capacity(table.capacity)?;
        // New tables don't have an id yet.
        table.status.ensure_manual_target(0)?;

        debug!(capacity = table.capacity, status = %table.status, "Inserting table");

        let table = sqlx::query_as::<_, Table>(
            r#"
            INSERT INTO "table" (status, capacity)
            VALUES (?1, ?2)
            RETURNING id, status, capacity
            "#,
        )
        .bind(table.status)
        .bind(table.capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(table)
    }

    /// Gets a table by ID.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<Table>> {
        let table = sqlx::query_as::<_, Table>(
            r#"SELECT id, status, capacity FROM "table" WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Lists all tables by id.
    pub async fn list(&self) -> ServiceResult<Vec<Table>> {
        let tables = sqlx::query_as::<_, Table>(
            r#"SELECT id, status, capacity FROM "table" ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Lists all tables with the id of the open tab seated at each.
    pub async fn list_overview(&self) -> ServiceResult<Vec<TableOverview>> {
        let tables = sqlx::query_as::<_, TableOverview>(
            r#"
            SELECT t.id, t.status, t.capacity, tab.id AS open_tab_id
            FROM "table" t
            LEFT JOIN tab ON tab.table_id = t.id AND tab.closed_at IS NULL
            ORDER BY t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Counts tables.
    pub async fn count(&self) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "table""#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Changes a table's seat count. Allowed at any status.
    pub async fn update_capacity(&self, id: i64, capacity: i64) -> ServiceResult<Table> {
        validate_capacity(capacity)?;

        debug!(table_id = id, capacity, "Updating table capacity");

        sqlx::query_as::<_, Table>(
            r#"
            UPDATE "table" SET capacity = ?2
            WHERE id = ?1
            RETURNING id, status, capacity
            "#,
        )
        .bind(id)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("Table", id).into())
    }

    /// Sets a table's status by hand (`free` ⇄ `reserved`).
    ///
    /// ## Errors
    /// - `StateConflict` when asked for `occupied`, or when the table has an
    ///   open tab
    /// - `NotFound` for an unknown table
    pub async fn set_status(&self, id: i64, status: TableStatus) -> ServiceResult<Table> {
        status.ensure_manual_target(id)?;

        debug!(table_id = id, status = %status, "Setting table status");

        let mut tx = self.pool.begin().await?;

        let table = sqlx::query_as::<_, Table>(
            r#"
            UPDATE "table" SET status = ?2
            WHERE id = ?1 AND status != 'occupied'
            RETURNING id, status, capacity
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(table) = table else {
            let err = occupied_or_missing(&mut tx, id).await?;
            warn!(table_id = id, error = %err, "Table status change rejected");
            return Err(err.into());
        };

        commit(tx, "set_table_status").await?;

        info!(table_id = id, status = %table.status, "Table status changed");
        Ok(table)
    }

    /// Deletes a table that has no open tab.
    ///
    /// Tables with closed tabs in their history are kept by the foreign key
    /// (reported as `StateConflict`).
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(table_id = id, "Deleting table");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(r#"DELETE FROM "table" WHERE id = ?1 AND status != 'occupied'"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            let err = occupied_or_missing(&mut tx, id).await?;
            warn!(table_id = id, error = %err, "Table delete rejected");
            return Err(err.into());
        }

        commit(tx, "delete_table").await?;

        info!(table_id = id, "Table deleted");
        Ok(())
    }
}

/// Explains why a guarded table write matched no row.
async fn occupied_or_missing(conn: &mut SqliteConnection, id: i64) -> ServiceResult<CoreError> {
    let open_tab: Option<(Option<i64>,)> = sqlx::query_as(
        r#"
        SELECT tab.id
        FROM "table" t
        LEFT JOIN tab ON tab.table_id = t.id AND tab.closed_at IS NULL
        WHERE t.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(match open_tab {
        None => CoreError::not_found("Table", id),
        Some((Some(tab_id),)) => CoreError::TableHasOpenTab {
            table_id: id,
            tab_id,
        },
        // Occupied without an open tab; the lifecycle never leaves this state.
        Some((None,)) => CoreError::TableNotFree {
            table_id: id,
            status: TableStatus::Occupied,
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
