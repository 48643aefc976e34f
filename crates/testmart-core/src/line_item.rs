//! # Line Items and Discounts
//!
//! A [`LineItem`] is one product at a quantity with its discount already
//! applied. A [`Discount`] is a cart-wide reduction not tied to a product.
//! A purchase holds both, as [`PurchaseItem`].
//!
//! ## Percentage Discounts
//! [`LineItem::apply_discount`] is the only place a percentage turns into
//! money. Promo codes and multi-buy tiers both go through it:
//! ```text
//! new unit price  = current price × (100 - p) / 100
//! total discount  = pcs × (regular price - new unit price)
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::product::Product;
use crate::validation::{validate_computed_price, validate_count, validate_price, ValidationResult};

/// Longest description shown for a line item.
pub const MAX_DESCRIPTION_CHARS: usize = 32;

// =============================================================================
// Line Item
// =============================================================================

/// One or more pieces of a single product, with the discount applied to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    product: Product,
    pcs: i64,
    total_discount: Money,
}

impl LineItem {
    /// Creates a line item.
    ///
    /// `total_discount` is in cents for the whole line, not per piece.
    pub fn new(product: Product, pcs: i64, total_discount: i64) -> ValidationResult<Self> {
        validate_count(pcs)?;
        let total_discount = validate_price("total_discount", total_discount)?;
        Self::checked(product, pcs, total_discount)
    }

    /// Creates a line item whose discount was computed in floating point.
    pub(crate) fn with_computed_discount(
        product: Product,
        pcs: i64,
        total_discount: f64,
    ) -> ValidationResult<Self> {
        validate_count(pcs)?;
        let total_discount = validate_computed_price("total_discount", total_discount)?;
        Self::checked(product, pcs, total_discount)
    }

    fn checked(product: Product, pcs: i64, total_discount: Money) -> ValidationResult<Self> {
        match product.price().checked_multiply_quantity(pcs) {
            Some(total) if total.cents() >= 0 => Ok(LineItem {
                product,
                pcs,
                total_discount,
            }),
            Some(_) => Err(ValidationError::BelowZero {
                sku: product.sku().to_string(),
            }),
            None => Err(ValidationError::Overflow {
                sku: product.sku().to_string(),
            }),
        }
    }

    /// Returns a new line item with `percentage_points` taken off the current
    /// effective unit price.
    ///
    /// The discounted price becomes the sale price of a derived product; the
    /// line's total discount is recomputed against the regular price, so any
    /// earlier sale or promo reduction is folded in.
    ///
    /// ## Example
    /// ```rust
    /// use testmart_core::{LineItem, Product};
    ///
    /// let shirt = Product::new("SHIRT", "Shirt", 2500, None).unwrap();
    /// let item = LineItem::new(shirt, 2, 0).unwrap();
    ///
    /// let discounted = item.apply_discount(10).unwrap();
    /// assert_eq!(discounted.unit_price().cents(), 2250);
    /// assert_eq!(discounted.total_discount().cents(), 500);
    /// assert_eq!(discounted.total_price().cents(), 4500);
    /// ```
    ///
    /// ## Errors
    /// A price that doesn't land on a whole cent is rejected, as is any
    /// percentage above 100.
    pub fn apply_discount(&self, percentage_points: u32) -> ValidationResult<LineItem> {
        let current = self.product.price().as_f64();
        let new_sale_price = current * (100.0 - f64::from(percentage_points)) / 100.0;
        let new_total_discount =
            self.pcs as f64 * (self.product.regular_price().as_f64() - new_sale_price);
        let product = self.product.with_computed_sale_price(new_sale_price)?;
        LineItem::with_computed_discount(product, self.pcs, new_total_discount)
    }

    /// The product on this line.
    #[inline]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// SKU of the product on this line.
    #[inline]
    pub fn sku(&self) -> &str {
        self.product.sku()
    }

    /// Product name, cut to 32 characters.
    pub fn description(&self) -> String {
        self.product.name().chars().take(MAX_DESCRIPTION_CHARS).collect()
    }

    /// Number of pieces.
    #[inline]
    pub fn pcs(&self) -> i64 {
        self.pcs
    }

    /// Effective unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.price()
    }

    /// Total discount applied to the whole line.
    #[inline]
    pub fn total_discount(&self) -> Money {
        self.total_discount
    }

    /// Total price of the line after discounts.
    #[inline]
    pub fn total_price(&self) -> Money {
        self.product.price() * self.pcs
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount applied to the entire purchase rather than to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    description: String,
    total_discount: Money,
}

impl Discount {
    pub(crate) fn new(description: impl Into<String>, total_discount: Money) -> Self {
        Discount {
            description: description.into(),
            total_discount,
        }
    }

    /// Name shown on the receipt, e.g. `-10% OVER $100`.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Amount taken off the purchase.
    #[inline]
    pub fn total_discount(&self) -> Money {
        self.total_discount
    }
}

// =============================================================================
// Purchase Item
// =============================================================================

/// An entry of a purchase: either a product line or a cart-wide discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseItem {
    Line(LineItem),
    Discount(Discount),
}

impl PurchaseItem {
    /// Discount carried by this entry, whichever kind it is.
    pub fn total_discount(&self) -> Money {
        match self {
            PurchaseItem::Line(item) => item.total_discount(),
            PurchaseItem::Discount(discount) => discount.total_discount(),
        }
    }

    /// The line item, if this entry is one.
    pub fn as_line(&self) -> Option<&LineItem> {
        match self {
            PurchaseItem::Line(item) => Some(item),
            PurchaseItem::Discount(_) => None,
        }
    }

    /// The cart-wide discount, if this entry is one.
    pub fn as_discount(&self) -> Option<&Discount> {
        match self {
            PurchaseItem::Line(_) => None,
            PurchaseItem::Discount(discount) => Some(discount),
        }
    }
}

impl From<LineItem> for PurchaseItem {
    fn from(item: LineItem) -> Self {
        PurchaseItem::Line(item)
    }
}

impl From<Discount> for PurchaseItem {
    fn from(discount: Discount) -> Self {
        PurchaseItem::Discount(discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::new("SHIRT", "Shirt", 2500, None).unwrap()
    }

    #[test]
    fn test_rejects_bad_counts_and_discounts() {
        assert!(LineItem::new(shirt(), -2, 0).is_err());
        assert!(LineItem::new(shirt(), 0, 0).is_err());
        let err = LineItem::new(shirt(), 1, -500).unwrap_err();
        assert_eq!(err.field(), Some("total_discount"));
    }

    #[test]
    fn test_line_total_out_of_range_is_overflow() {
        let yacht = Product::new("YACHT", "Yacht", i64::MAX, None).unwrap();
        let err = LineItem::new(yacht, 2, 0).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { .. }));
        assert_eq!(err.to_string(), "Amount out of range: YACHT");
    }

    #[test]
    fn test_long_name_is_cut_to_32_chars() {
        let pants = Product::new("PANTS", "1234567890123456789012345678901234567890", 5900, None)
            .unwrap();
        let item = LineItem::new(pants, 1, 0).unwrap();
        assert_eq!(item.description(), "12345678901234567890123456789012");
    }

    #[test]
    fn test_totals() {
        let socks = Product::new("CHEAPSOCKS", "Cheap crew socks", 500, Some(300)).unwrap();
        let item = LineItem::new(socks, 3, 600).unwrap();
        assert_eq!(item.unit_price(), Money::from_cents(300));
        assert_eq!(item.total_price(), Money::from_cents(900));
        assert_eq!(item.total_discount(), Money::from_cents(600));
    }

    #[test]
    fn test_apply_zero_percent_is_identity_on_price() {
        let item = LineItem::new(shirt(), 3, 0).unwrap();
        let same = item.apply_discount(0).unwrap();
        assert_eq!(same.total_price(), item.total_price());
        assert_eq!(same.total_discount(), Money::zero());
    }

    #[test]
    fn test_apply_discount_compounds_on_sale_price() {
        let suit = Product::new("SUIT", "Suit", 20000, Some(10000)).unwrap();
        let item = LineItem::new(suit, 1, 10000).unwrap();

        let discounted = item.apply_discount(20).unwrap();
        assert_eq!(discounted.unit_price(), Money::from_cents(8000));
        assert_eq!(discounted.total_discount(), Money::from_cents(12000));
        assert_eq!(discounted.product().regular_price(), Money::from_cents(20000));
    }

    #[test]
    fn test_apply_discount_rejects_fractional_cents() {
        let odd = Product::new("ODD", "Odd price", 333, None).unwrap();
        let item = LineItem::new(odd, 1, 0).unwrap();
        let err = item.apply_discount(10).unwrap_err();
        assert_eq!(err.field(), Some("sale_price"));
    }

    #[test]
    fn test_apply_discount_above_100_percent_fails() {
        let item = LineItem::new(shirt(), 1, 0).unwrap();
        assert!(item.apply_discount(120).is_err());
    }

    #[test]
    fn test_purchase_item_accessors() {
        let line: PurchaseItem = LineItem::new(shirt(), 1, 100).unwrap().into();
        let discount: PurchaseItem = Discount::new("-10% OVER $100", Money::from_cents(1000)).into();

        assert_eq!(line.total_discount(), Money::from_cents(100));
        assert_eq!(discount.total_discount(), Money::from_cents(1000));
        assert!(line.as_line().is_some());
        assert!(discount.as_discount().is_some());
        assert!(discount.as_line().is_none());
    }
}
