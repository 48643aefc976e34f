//! # Error Types
//!
//! Domain-specific error types for testmart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  testmart-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing/orchestration failures                 │
//! │  └── ValidationError  - Value object and input validation failures     │
//! │                                                                         │
//! │  testmart-cli errors (app)                                             │
//! │  └── AppError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → stderr / JSON          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validation failure carries the field name, the offending value
//! (JSON-encoded) and the type the value was observed as.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Observed Value Type
// =============================================================================

/// The type a rejected value was observed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Text input (SKU, name, address, promo code, service name).
    String,
    /// Whole number (prices in cents, counts).
    Integer,
    /// Floating point intermediate (discounted prices before validation).
    Number,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Number => write!(f, "number"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised synchronously by constructors and cart mutations; nothing partially
/// constructed escapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A value broke the rule for its field.
    ///
    /// ## Example Message
    /// ```text
    /// Invalid sku: "" (string)
    /// Invalid regular_price: -100 (integer)
    /// Invalid sale_price: 299.7 (number)
    /// ```
    #[error("Invalid {field}: {value} ({kind})")]
    Invalid {
        field: &'static str,
        value: String,
        kind: ValueKind,
    },

    /// Sale price exceeds the regular price.
    #[error("Sale price cannot be higher than regular price: {sale_price} > {regular_price}")]
    SalePriceAboveRegular {
        regular_price: i64,
        sale_price: i64,
    },

    /// Shipping service name is not one of the supported carriers.
    #[error("Invalid shipping service: {0:?}")]
    UnknownShippingService(String),

    /// Line total would be negative.
    #[error("Cannot discount a product below zero: {sku}")]
    BelowZero { sku: String },

    /// A line amount does not fit in cents.
    #[error("Amount out of range: {sku}")]
    Overflow { sku: String },
}

impl ValidationError {
    /// Builds an [`ValidationError::Invalid`] for a text value.
    pub fn invalid_string(field: &'static str, value: &str) -> Self {
        ValidationError::Invalid {
            field,
            value: encode(value),
            kind: ValueKind::String,
        }
    }

    /// Builds an [`ValidationError::Invalid`] for a whole number.
    pub fn invalid_integer(field: &'static str, value: i64) -> Self {
        ValidationError::Invalid {
            field,
            value: value.to_string(),
            kind: ValueKind::Integer,
        }
    }

    /// Builds an [`ValidationError::Invalid`] for a floating point value.
    pub fn invalid_number(field: &'static str, value: f64) -> Self {
        ValidationError::Invalid {
            field,
            value: encode(&value),
            kind: ValueKind::Number,
        }
    }

    /// Name of the field that failed, when the error is field-specific.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Invalid { field, .. } => Some(*field),
            ValidationError::SalePriceAboveRegular { .. } => Some("sale_price"),
            ValidationError::UnknownShippingService(_) => Some("service"),
            ValidationError::BelowZero { .. } | ValidationError::Overflow { .. } => None,
        }
    }
}

/// JSON-encodes a rejected value; NaN and infinities have no JSON form and
/// fall back to their debug text.
fn encode<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .ok()
        .filter(|s| s != "null")
        .unwrap_or_else(|| format!("{:?}", value))
}

// =============================================================================
// Core Error
// =============================================================================

/// Pricing and orchestration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The cart was priced before a shipping selection was set.
    #[error("Cannot price a cart without a shipping selection")]
    MissingShippingSelection,

    /// A purchase was assembled without a shipping quote.
    #[error("Invalid ShippingQuote: a purchase requires a shipping quote")]
    MissingShippingQuote,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_string_is_json_quoted() {
        let err = ValidationError::invalid_string("sku", "");
        assert_eq!(err.to_string(), "Invalid sku: \"\" (string)");

        let err = ValidationError::invalid_string("name", " \t");
        assert_eq!(err.to_string(), "Invalid name: \" \\t\" (string)");
    }

    #[test]
    fn test_invalid_numbers() {
        let err = ValidationError::invalid_integer("regular_price", -100);
        assert_eq!(err.to_string(), "Invalid regular_price: -100 (integer)");

        let err = ValidationError::invalid_number("sale_price", 12.34);
        assert_eq!(err.to_string(), "Invalid sale_price: 12.34 (number)");

        let err = ValidationError::invalid_number("sale_price", f64::NAN);
        assert_eq!(err.to_string(), "Invalid sale_price: NaN (number)");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(
            ValidationError::invalid_integer("pcs", 0).field(),
            Some("pcs")
        );
        let err = ValidationError::SalePriceAboveRegular {
            regular_price: 1000,
            sale_price: 1001,
        };
        assert_eq!(err.field(), Some("sale_price"));
        assert_eq!(
            err.to_string(),
            "Sale price cannot be higher than regular price: 1001 > 1000"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::invalid_integer("pcs", -2);
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
