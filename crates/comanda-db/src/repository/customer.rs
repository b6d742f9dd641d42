//! # Customer Repository
//!
//! Registered customers. Name and phone are optional; the CPF is the key
//! the counter looks people up by.

use comanda_core::validation::{validate_cpf, validate_optional_name, validate_phone};
use comanda_core::{CoreError, Customer, NewCustomer};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::ServiceResult;

/// Repository for customers.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

/// Trims an optional field, mapping blank to `None`.
fn clean(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn validate(customer: &NewCustomer) -> ServiceResult<()> {
    validate_cpf(&customer.cpf)?;
    validate_optional_name(clean(&customer.name))?;
    validate_phone(clean(&customer.phone))?;
    Ok(())
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer. CPFs are unique.
    pub async fn insert(&self, customer: &NewCustomer) -> ServiceResult<Customer> {
        validate(customer)?;

        debug!("Inserting customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customer (cpf, name, phone)
            VALUES (?1, ?2, ?3)
            RETURNING id, cpf, name, phone
            "#,
        )
        .bind(customer.cpf.trim())
        .bind(clean(&customer.name))
        .bind(clean(&customer.phone))
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, cpf, name, phone FROM customer WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by CPF.
    pub async fn find_by_cpf(&self, cpf: &str) -> ServiceResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, cpf, name, phone FROM customer WHERE cpf = ?1",
        )
        .bind(cpf.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists customers ordered by name; anonymous customers last.
    pub async fn list(&self) -> ServiceResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, cpf, name, phone
            FROM customer
            ORDER BY name IS NULL, name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Replaces a customer's details.
    pub async fn update(&self, id: i64, customer: &NewCustomer) -> ServiceResult<Customer> {
        validate(customer)?;

        debug!(customer_id = id, "Updating customer");

        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customer SET cpf = ?2, name = ?3, phone = ?4
            WHERE id = ?1
            RETURNING id, cpf, name, phone
            "#,
        )
        .bind(id)
        .bind(customer.cpf.trim())
        .bind(clean(&customer.name))
        .bind(clean(&customer.phone))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("Customer", id).into())
    }

    /// Deletes a customer.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        debug!(customer_id = id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customer WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Customer", id).into());
        }

        Ok(())
    }
}
