//! # Validation Module
//!
//! Input validation rules shared by every value object and cart mutation.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field              Rule                                                │
//! │  ─────────────────  ───────────────────────────────────────────────     │
//! │  SKU                1-16 chars, no leading/trailing whitespace          │
//! │  Name / address     at least one non-whitespace char                    │
//! │  Price / discount   whole cents, >= 0                                   │
//! │  Count              1-999                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use testmart_core::validation::{validate_sku, validate_count};
//!
//! assert!(validate_sku("SHIRT").is_ok());
//! assert!(validate_sku(" SHIRT").is_err());
//! assert!(validate_count(0).is_err());
//! assert!(validate_count(1000).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest SKU accepted.
pub const MAX_SKU_LENGTH: usize = 16;

/// Most pieces of one SKU a cart line can hold.
pub const MAX_PCS: i64 = 999;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// Unlike names, a SKU is never trimmed for you: surrounding whitespace is an
/// error, not something to clean up.
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let len = sku.chars().count();
    if sku.trim().len() != sku.len() || len == 0 || len > MAX_SKU_LENGTH {
        return Err(ValidationError::invalid_string("sku", sku));
    }
    Ok(())
}

/// Validates free text that must not be blank (product names, addresses).
pub fn validate_description(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::invalid_string(field, value));
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price or discount amount given in whole cents.
///
/// ## Example
/// ```rust
/// use testmart_core::validation::validate_price;
///
/// assert_eq!(validate_price("regular_price", 2590).unwrap().cents(), 2590);
/// assert!(validate_price("regular_price", 0).is_ok());
/// assert!(validate_price("regular_price", -100).is_err());
/// ```
pub fn validate_price(field: &'static str, cents: i64) -> ValidationResult<Money> {
    if cents < 0 {
        return Err(ValidationError::invalid_integer(field, cents));
    }
    Ok(Money::from_cents(cents))
}

/// Validates a price or discount that was computed in floating point.
///
/// The value must be finite, non-negative and land exactly on a whole cent;
/// percentage discounts that produce fractional cents are rejected here.
///
/// ## Example
/// ```rust
/// use testmart_core::validation::validate_computed_price;
///
/// assert_eq!(validate_computed_price("sale_price", 2250.0).unwrap().cents(), 2250);
/// assert!(validate_computed_price("sale_price", 299.7).is_err());
/// assert!(validate_computed_price("sale_price", -0.5).is_err());
/// ```
pub fn validate_computed_price(field: &'static str, cents: f64) -> ValidationResult<Money> {
    if !cents.is_finite() || cents < 0.0 || cents.fract() != 0.0 || cents > i64::MAX as f64 {
        return Err(ValidationError::invalid_number(field, cents));
    }
    Ok(Money::from_cents(cents as i64))
}

/// Validates a piece count.
pub fn validate_count(count: i64) -> ValidationResult<()> {
    if !(1..=MAX_PCS).contains(&count) {
        return Err(ValidationError::invalid_integer("pcs", count));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("123123123").is_ok());
        assert!(validate_sku("A").is_ok());
        assert!(validate_sku("1234567890123456").is_ok());
        assert!(validate_sku("HAS SPACE").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku(" ABC").is_err());
        assert!(validate_sku("ABC\t").is_err());
        assert!(validate_sku("12345678901234567").is_err());
    }

    #[test]
    fn test_validate_sku_error_message() {
        let too_long = "123456789012345678901234567890123";
        let err = validate_sku(too_long).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid sku: \"{}\" (string)", too_long));
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("name", "T-shirt").is_ok());
        assert!(validate_description("name", "").is_err());
        assert!(validate_description("name", " \t").is_err());
        assert_eq!(
            validate_description("address", " ").unwrap_err().field(),
            Some("address")
        );
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("regular_price", 0).is_ok());
        assert!(validate_price("regular_price", 2590).is_ok());
        let err = validate_price("regular_price", -100).unwrap_err();
        assert_eq!(err.to_string(), "Invalid regular_price: -100 (integer)");
    }

    #[test]
    fn test_validate_computed_price() {
        assert_eq!(validate_computed_price("sale_price", 0.0).unwrap(), Money::zero());
        assert_eq!(
            validate_computed_price("sale_price", 4000.0).unwrap(),
            Money::from_cents(4000)
        );
        assert!(validate_computed_price("sale_price", 12.34).is_err());
        assert!(validate_computed_price("sale_price", f64::NAN).is_err());
        assert!(validate_computed_price("sale_price", f64::INFINITY).is_err());
        assert!(validate_computed_price("sale_price", -1.0).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(1).is_ok());
        assert!(validate_count(100).is_ok());
        assert!(validate_count(MAX_PCS).is_ok());
        assert!(validate_count(0).is_err());
        assert!(validate_count(-2).is_err());
        assert!(validate_count(MAX_PCS + 1).is_err());
        assert!(validate_count(i64::MAX).is_err());
    }
}
