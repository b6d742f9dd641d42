//! # Staff Repository
//!
//! Staff members who open and serve tabs.

use comanda_core::validation::{validate_cpf, validate_person_name};
use comanda_core::{CoreError, NewStaff, Staff};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::ServiceResult;

/// Repository for staff members.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

fn validate(staff: &NewStaff) -> ServiceResult<()> {
    validate_cpf(&staff.cpf)?;
    validate_person_name(&staff.name)?;
    Ok(())
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Registers a staff member. CPFs are unique.
    pub async fn insert(&self, staff: &NewStaff) -> ServiceResult<Staff> {
        validate(staff)?;

        debug!(name = %staff.name, "Inserting staff");

        let staff = sqlx::query_as::<_, Staff>(
            "INSERT INTO staff (cpf, name) VALUES (?1, ?2) RETURNING id, cpf, name",
        )
        .bind(staff.cpf.trim())
        .bind(staff.name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Gets a staff member by ID.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>("SELECT id, cpf, name FROM staff WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Lists staff ordered by name.
    pub async fn list(&self) -> ServiceResult<Vec<Staff>> {
        let staff = sqlx::query_as::<_, Staff>("SELECT id, cpf, name FROM staff ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Replaces a staff member's CPF and name.
    pub async fn update(&self, id: i64, staff: &NewStaff) -> ServiceResult<Staff> {
        validate(staff)?;

        debug!(staff_id = id, "Updating staff");

        sqlx::query_as::<_, Staff>(
            "UPDATE staff SET cpf = ?2, name = ?3 WHERE id = ?1 RETURNING id, cpf, name",
        )
        .bind(id)
        .bind(staff.cpf.trim())
        .bind(staff.name.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("Staff", id).into())
    }

    /// Deletes a staff member with no tabs on record.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(staff_id = id, "Deleting staff");

        let result = sqlx::query("DELETE FROM staff WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Staff", id).into());
        }

        Ok(())
    }
}
