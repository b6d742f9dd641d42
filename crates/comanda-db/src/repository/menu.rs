//! # Menu Repository
//!
//! Menu items and their current prices.
//!
//! Price edits only affect entries appended afterwards; existing line items
//! carry their own frozen price (see [`LedgerRepository`](super::ledger::LedgerRepository)).

use comanda_core::validation::{validate_description, validate_price_cents, validate_sub_description};
use comanda_core::{CoreError, MenuItem, NewMenuItem};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::ServiceResult;

/// Repository for menu items.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

fn validate(item: &NewMenuItem) -> ServiceResult<()> {
    validate_description(&item.description)?;
    validate_sub_description(item.sub_description.as_deref())?;
    validate_price_cents(item.price_cents)?;
    Ok(())
}

fn sub_description(item: &NewMenuItem) -> Option<&str> {
    item.sub_description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Adds an item to the menu.
    pub async fn insert(&self, item: &NewMenuItem) -> ServiceResult<MenuItem> {
        validate(item)?;

        debug!(description = %item.description, price_cents = item.price_cents, "Inserting menu item");

        let item = sqlx::query_as::<_, MenuItem>(
            r#"
            INSERT INTO menu_item (description, sub_description, price_cents)
            VALUES (?1, ?2, ?3)
            RETURNING id, description, sub_description, price_cents
            "#,
        )
        .bind(item.description.trim())
        .bind(sub_description(item))
        .bind(item.price_cents)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a menu item by ID.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<MenuItem>> {
        let item = sqlx::query_as::<_, MenuItem>(
            "SELECT id, description, sub_description, price_cents FROM menu_item WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the menu ordered by description.
    pub async fn list(&self) -> ServiceResult<Vec<MenuItem>> {
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, description, sub_description, price_cents
            FROM menu_item
            ORDER BY description, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Replaces a menu item's description and price.
    pub async fn update(&self, id: i64, item: &NewMenuItem) -> ServiceResult<MenuItem> {
        validate(item)?;

        let updated = sqlx::query_as::<_, MenuItem>(
            r#"
            UPDATE menu_item
            SET description = ?2, sub_description = ?3, price_cents = ?4
            WHERE id = ?1
            RETURNING id, description, sub_description, price_cents
            "#,
        )
        .bind(id)
        .bind(item.description.trim())
        .bind(sub_description(item))
        .bind(item.price_cents)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("Menu item", id))?;

        info!(menu_item_id = id, price_cents = updated.price_cents, "Menu item updated");
        Ok(updated)
    }

    /// Deletes a menu item never ordered on any tab.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(menu_item_id = id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_item WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Menu item", id).into());
        }

        Ok(())
    }
}
