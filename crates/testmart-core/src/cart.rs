//! # Shopping Cart
//!
//! The mutable aggregate: selected products, their counts, promo codes and
//! the shipping selection. Pricing is a pure read of the current state.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation                 State Change                                 │
//! │  ─────────────────────     ──────────────────────────────────────────   │
//! │  add_product(p, n)         counts[sku] += n, products[sku] = p          │
//! │  remove_product(sku)       drop products[sku] and counts[sku]           │
//! │  update_count(sku, n)      counts[sku] = n                              │
//! │  add_promo_code(code)      codes ∪ {code}                               │
//! │  remove_promo_code(code)   codes \ {code}                               │
//! │  update_shipping(sel)      shipping = sel                               │
//! │                                                                         │
//! │  to_purchase()             promo → multi-buy → volume → shipping        │
//! │                            (read only)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! A cart assumes a single owner. Whoever shares carts between callers must
//! wrap each one in its own lock for the whole mutate-then-price sequence.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::line_item::LineItem;
use crate::money::Money;
use crate::pipeline::{
    apply_multi_buy_discounts, apply_promo_code_discounts, apply_volume_discounts,
    qualifies_for_free_shipping,
};
use crate::product::Product;
use crate::purchase::Purchase;
use crate::shipping::{FlatRateQuoter, ShippingQuote, ShippingQuoter, ShippingSelection};
use crate::validation::{validate_count, ValidationResult};

/// Products that can be bought together in a single transaction.
#[derive(Debug, Clone)]
pub struct ShoppingCart {
    /// Selected product per SKU; re-adding a SKU replaces the product.
    products: BTreeMap<String, Product>,

    /// Pieces per SKU.
    counts: BTreeMap<String, i64>,

    /// Active promo codes, in the order they were added, without duplicates.
    promo_codes: Vec<String>,

    shipping: Option<ShippingSelection>,
    quoter: Arc<dyn ShippingQuoter>,
}

impl ShoppingCart {
    /// Creates an empty cart priced with the given quoter.
    pub fn new(quoter: Arc<dyn ShippingQuoter>) -> Self {
        ShoppingCart {
            products: BTreeMap::new(),
            counts: BTreeMap::new(),
            promo_codes: Vec::new(),
            shipping: None,
            quoter,
        }
    }

    // =========================================================================
    // Promo Codes
    // =========================================================================

    /// Adds a promo code. Adding a code twice has no effect.
    pub fn add_promo_code(&mut self, code: impl Into<String>) -> &mut Self {
        let code = code.into();
        if !self.has_promo_code(&code) {
            debug!(code = %code, "promo code added");
            self.promo_codes.push(code);
        }
        self
    }

    /// Removes a promo code if present.
    pub fn remove_promo_code(&mut self, code: &str) -> &mut Self {
        self.promo_codes.retain(|c| c != code);
        self
    }

    /// Whether a promo code is active.
    pub fn has_promo_code(&self, code: &str) -> bool {
        self.promo_codes.iter().any(|c| c == code)
    }

    /// Active promo codes in the order they were added.
    pub fn promo_codes(&self) -> &[String] {
        &self.promo_codes
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Adds one piece of a product.
    pub fn add_product(&mut self, product: Product) -> ValidationResult<&mut Self> {
        self.add_product_pcs(product, 1)
    }

    /// Adds `pcs` pieces of a product.
    ///
    /// ## Behavior
    /// - SKU already in cart: count increases, stored product is replaced
    /// - SKU not in cart: added with `pcs` pieces
    /// - Accumulated count above [`MAX_PCS`](crate::validation::MAX_PCS): rejected, cart unchanged
    pub fn add_product_pcs(&mut self, product: Product, pcs: i64) -> ValidationResult<&mut Self> {
        validate_count(pcs)?;
        let sku = product.sku().to_string();
        let total = self
            .count(&sku)
            .unwrap_or(0)
            .checked_add(pcs)
            .ok_or_else(|| ValidationError::Overflow { sku: sku.clone() })?;
        validate_count(total)?;

        self.counts.insert(sku.clone(), total);
        debug!(sku = %sku, pcs, total, "product added");
        self.products.insert(sku, product);
        Ok(self)
    }

    /// Removes a product, whatever its count.
    pub fn remove_product(&mut self, sku: &str) -> &mut Self {
        self.products.remove(sku);
        self.counts.remove(sku);
        debug!(sku = %sku, "product removed");
        self
    }

    /// Replaces the count for a SKU.
    pub fn update_count(&mut self, sku: &str, pcs: i64) -> ValidationResult<&mut Self> {
        validate_count(pcs)?;
        self.counts.insert(sku.to_string(), pcs);
        debug!(sku = %sku, pcs, "count updated");
        Ok(self)
    }

    /// Stored product for a SKU.
    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.get(sku)
    }

    /// Stored count for a SKU.
    pub fn count(&self, sku: &str) -> Option<i64> {
        self.counts.get(sku).copied()
    }

    /// Whether the cart holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    // =========================================================================
    // Shipping
    // =========================================================================

    /// Replaces the shipping selection.
    pub fn update_shipping(&mut self, selection: ShippingSelection) -> &mut Self {
        debug!(service = %selection.service(), "shipping updated");
        self.shipping = Some(selection);
        self
    }

    pub fn shipping(&self) -> Option<&ShippingSelection> {
        self.shipping.as_ref()
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// One line per product, carrying only the catalog sale discount.
    pub fn items(&self) -> ValidationResult<Vec<LineItem>> {
        self.products
            .iter()
            .filter_map(|(sku, product)| self.counts.get(sku).map(|pcs| (product, *pcs)))
            .map(|(product, pcs)| {
                let discount = product
                    .discount()
                    .checked_multiply_quantity(pcs)
                    .ok_or_else(|| ValidationError::Overflow {
                        sku: product.sku().to_string(),
                    })?;
                LineItem::new(product.clone(), pcs, discount.cents())
            })
            .collect()
    }

    /// Subtotal of [`items`](Self::items) before any promotion.
    pub fn subtotal(&self) -> ValidationResult<Money> {
        Ok(self.items()?.iter().map(LineItem::total_price).sum())
    }

    /// Prices the cart.
    ///
    /// Runs the promo-code, multi-buy and volume stages over the current
    /// items, then resolves shipping: free with `FREESHIP` or a raw subtotal
    /// of at least $75, otherwise whatever the quoter says.
    ///
    /// ## Errors
    /// - [`CoreError::MissingShippingSelection`] if no selection was set
    /// - [`CoreError::Validation`] if a discount lands on a fractional cent
    pub fn to_purchase(&self) -> CoreResult<Purchase> {
        let selection = self
            .shipping
            .as_ref()
            .ok_or(CoreError::MissingShippingSelection)?;

        let items = self.items()?;
        let after_promo_codes = apply_promo_code_discounts(items.clone(), &self.promo_codes)?;
        let after_multi_buy = apply_multi_buy_discounts(after_promo_codes)?;
        let final_items = apply_volume_discounts(after_multi_buy);

        let cost = if qualifies_for_free_shipping(&items, &self.promo_codes) {
            Money::zero()
        } else {
            self.quoter.quote(selection)
        };
        let quote = ShippingQuote::new(selection.clone(), cost.cents())?;

        debug!(
            lines = final_items.len(),
            shipping = cost.cents(),
            "cart priced"
        );
        Ok(Purchase::new(final_items, quote))
    }
}

/// An empty cart priced with [`FlatRateQuoter`].
impl Default for ShoppingCart {
    fn default() -> Self {
        ShoppingCart::new(Arc::new(FlatRateQuoter))
    }
}
