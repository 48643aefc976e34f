//! # Product
//!
//! A catalog entry: SKU, display name, regular price and an optional sale
//! price. Products are immutable; discount stages derive new ones.
//!
//! ## Price Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  regular_price ─────┐                                                   │
//! │                     ├──► price    = sale_price ?? regular_price         │
//! │  sale_price (opt) ──┘    discount = regular_price - price   (>= 0)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_computed_price, validate_description, validate_price, validate_sku,
    ValidationResult,
};

/// Unvalidated product fields, as they arrive over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    pub regular_price: i64,
    #[serde(default)]
    pub sale_price: Option<i64>,
}

/// A product sold by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProductInput")]
pub struct Product {
    sku: String,
    name: String,
    regular_price: Money,
    sale_price: Option<Money>,
}

impl Product {
    /// Creates a product, validating every field.
    ///
    /// ## Example
    /// ```rust
    /// use testmart_core::Product;
    ///
    /// let socks = Product::new("CHEAPSOCKS", "Cheap crew socks", 500, Some(300)).unwrap();
    /// assert_eq!(socks.price().cents(), 300);
    /// assert_eq!(socks.discount().cents(), 200);
    ///
    /// assert!(Product::new("SOCKS", "Socks", 1000, Some(1001)).is_err());
    /// ```
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        regular_price: i64,
        sale_price: Option<i64>,
    ) -> ValidationResult<Self> {
        let sku = sku.into();
        let name = name.into();
        validate_sku(&sku)?;
        validate_description("name", &name)?;
        let regular = validate_price("regular_price", regular_price)?;
        let sale = sale_price
            .map(|cents| validate_price("sale_price", cents))
            .transpose()?;
        Self::checked(sku, name, regular, sale)
    }

    /// Derives a copy of this product whose sale price was computed by a
    /// percentage discount.
    ///
    /// The computed price must be whole cents and must not exceed the regular
    /// price.
    pub fn with_computed_sale_price(&self, sale_price: f64) -> ValidationResult<Self> {
        let sale = validate_computed_price("sale_price", sale_price)?;
        Self::checked(self.sku.clone(), self.name.clone(), self.regular_price, Some(sale))
    }

    fn checked(
        sku: String,
        name: String,
        regular_price: Money,
        sale_price: Option<Money>,
    ) -> ValidationResult<Self> {
        if let Some(sale) = sale_price {
            if sale > regular_price {
                return Err(ValidationError::SalePriceAboveRegular {
                    regular_price: regular_price.cents(),
                    sale_price: sale.cents(),
                });
            }
        }
        Ok(Product {
            sku,
            name,
            regular_price,
            sale_price,
        })
    }

    /// Stock Keeping Unit.
    #[inline]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price before sales, promo codes or any other discount.
    #[inline]
    pub fn regular_price(&self) -> Money {
        self.regular_price
    }

    /// Current sale price, if the product is on sale.
    #[inline]
    pub fn sale_price(&self) -> Option<Money> {
        self.sale_price
    }

    /// Effective unit price: the sale price when present, else the regular price.
    #[inline]
    pub fn price(&self) -> Money {
        self.sale_price.unwrap_or(self.regular_price)
    }

    /// Whether a sale price below the regular price is in effect.
    pub fn on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.regular_price)
    }

    /// Per-unit discount from the regular price; zero when not on sale.
    #[inline]
    pub fn discount(&self) -> Money {
        self.regular_price - self.price()
    }
}

impl TryFrom<ProductInput> for Product {
    type Error = ValidationError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        Product::new(input.sku, input.name, input.regular_price, input.sale_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SKU: &str = "123123123";
    const VALID_NAME: &str = "T-shirt";
    const VALID_PRICE: i64 = 2590;

    #[test]
    fn test_price_derivation() {
        let regular = Product::new("SHIRT", "Shirt", 2500, None).unwrap();
        assert_eq!(regular.price(), Money::from_cents(2500));
        assert_eq!(regular.discount(), Money::zero());
        assert!(!regular.on_sale());

        let sale = Product::new("SUIT", "Suit", 29900, Some(14950)).unwrap();
        assert_eq!(sale.price(), Money::from_cents(14950));
        assert_eq!(sale.discount(), Money::from_cents(14950));
        assert!(sale.on_sale());
    }

    #[test]
    fn test_sale_price_equal_to_regular_is_not_a_sale() {
        // The storefront's `sale` getter compared against an unset field and was
        // always true; here a sale has to actually lower the price.
        let product = Product::new("HAT", "Hat", 1000, Some(1000)).unwrap();
        assert!(!product.on_sale());
        assert_eq!(product.discount(), Money::zero());
    }

    #[test]
    fn test_rejects_empty_sku() {
        let err = Product::new("", VALID_NAME, VALID_PRICE, None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid sku: \"\" (string)");
    }

    #[test]
    fn test_rejects_too_long_sku() {
        let err = Product::new("123456789012345678901234567890123", VALID_NAME, VALID_PRICE, None)
            .unwrap_err();
        assert_eq!(err.field(), Some("sku"));
    }

    #[test]
    fn test_rejects_blank_name() {
        assert!(Product::new(VALID_SKU, "", VALID_PRICE, None).is_err());
        let err = Product::new(VALID_SKU, " \t", VALID_PRICE, None).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_rejects_negative_prices() {
        let err = Product::new(VALID_SKU, VALID_NAME, -100, None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid regular_price: -100 (integer)");

        let err = Product::new(VALID_SKU, VALID_NAME, 1000, Some(-123)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid sale_price: -123 (integer)");
    }

    #[test]
    fn test_rejects_sale_price_above_regular() {
        let err = Product::new(VALID_SKU, VALID_NAME, 1000, Some(1001)).unwrap_err();
        assert!(matches!(err, ValidationError::SalePriceAboveRegular { .. }));
    }

    #[test]
    fn test_with_computed_sale_price() {
        let shirt = Product::new("SHIRT", "Shirt", 2500, None).unwrap();
        let discounted = shirt.with_computed_sale_price(2250.0).unwrap();
        assert_eq!(discounted.sku(), "SHIRT");
        assert_eq!(discounted.regular_price(), Money::from_cents(2500));
        assert_eq!(discounted.price(), Money::from_cents(2250));

        assert!(shirt.with_computed_sale_price(2249.5).is_err());
        assert!(shirt.with_computed_sale_price(2600.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"sku":"CHEAPSUIT","name":"Blue Suit","regularPrice":29900,"salePrice":14950}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price().cents(), 14950);

        let json = r#"{"sku":"50DOLLARSHIRT","name":"Retro Designer T-shirt","regularPrice":5000}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.sale_price(), None);

        let json = r#"{"sku":"","name":"Nameless","regularPrice":100}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
