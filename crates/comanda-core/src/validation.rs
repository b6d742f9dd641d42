//! # Validation Module
//!
//! Input validation for Comanda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: frontdesk (clap)                                             │
//! │  └── Type validation (argument parsing)                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository (comanda-db)                                      │
//! │  └── THIS MODULE: runs before any lookup or mutation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (quantity >= 1, price >= 0, status set)         │
//! │  ├── Foreign key constraints                                           │
//! │  └── Partial UNIQUE index (one open tab per table)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes ("Feijoada à moda" is 15).

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_TABLE_CAPACITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const DESCRIPTION_MAX: usize = 100;
const SUB_DESCRIPTION_MAX: usize = 255;
const NAME_MAX: usize = 255;
const PHONE_MAX: usize = 14;
const CPF_LEN: usize = 11;

fn too_long(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a menu item description.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_description;
///
/// assert!(validate_description("Frango Assado").is_ok());
/// assert!(validate_description("   ").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    too_long("description", description, DESCRIPTION_MAX)
}

/// Validates an optional menu item sub-description (at most 255 characters).
pub fn validate_sub_description(sub_description: Option<&str>) -> ValidationResult<()> {
    match sub_description {
        Some(s) => too_long("sub_description", s.trim(), SUB_DESCRIPTION_MAX),
        None => Ok(()),
    }
}

/// Validates a required person name (staff).
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    too_long("name", name, NAME_MAX)
}

/// Validates an optional person name (customers may stay anonymous).
pub fn validate_optional_name(name: Option<&str>) -> ValidationResult<()> {
    match name {
        Some(n) => too_long("name", n.trim(), NAME_MAX),
        None => Ok(()),
    }
}

/// Validates a CPF (Brazilian taxpayer id).
///
/// ## Rules
/// - Exactly 11 ASCII digits, no punctuation
///
/// Check digits are not verified; the counter only needs a stable key.
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_cpf;
///
/// assert!(validate_cpf("12345678901").is_ok());
/// assert!(validate_cpf("123.456.789-01").is_err());
/// ```
pub fn validate_cpf(cpf: &str) -> ValidationResult<()> {
    let cpf = cpf.trim();

    if cpf.is_empty() {
        return Err(ValidationError::Required {
            field: "cpf".to_string(),
        });
    }

    if cpf.len() != CPF_LEN || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "cpf".to_string(),
            reason: format!("must be exactly {CPF_LEN} digits"),
        });
    }

    Ok(())
}

/// Validates an optional phone number.
///
/// ## Rules
/// - At most 14 characters, e.g. "(71)99999-9999"
/// - Digits, spaces and `()+-` only
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone.map(str::trim) else {
        return Ok(());
    };

    too_long("phone", phone, PHONE_MAX)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '+' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and ()+-".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Tab: Add Item                                                          │
/// │                                                                         │
/// │  Waiter enters quantity: 2                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(2) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → append_item                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (courtesy items)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use comanda_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2000).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a table's seat count (1..=MAX_TABLE_CAPACITY).
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "capacity".to_string(),
        });
    }

    if capacity > MAX_TABLE_CAPACITY {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: MAX_TABLE_CAPACITY,
        });
    }

    Ok(())
}

/// Validates a service fee in basis points (0% to 100%).
pub fn validate_service_fee_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "service_fee_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates an entity id supplied by the operator.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
