//! # Discount Pipeline
//!
//! Each stage is a pure function from line items to line items; the cart
//! calls them in sequence.
//!
//! ## Stage Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart items (catalog sale discount only)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_promo_code_discounts   FIRSTTIME → 10% off every line            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_multi_buy_discounts    groups of 5 → 20%, groups of 3 → 10%      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_volume_discounts       subtotal ≥ $200 → -20%, ≥ $100 → -10%     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  purchase items (lines + at most one cart-wide discount)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Free shipping is decided on the raw cart, see [`qualifies_for_free_shipping`].

use crate::line_item::{Discount, LineItem, PurchaseItem};
use crate::money::Money;
use crate::validation::ValidationResult;

/// Promo code taking 10% off every line.
pub const FIRST_TIME_CODE: &str = "FIRSTTIME";

/// Promo code waiving shipping.
pub const FREE_SHIPPING_CODE: &str = "FREESHIP";

/// Raw cart subtotal at which shipping becomes free ($75).
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(7500);

/// Percentage points taken off by [`FIRST_TIME_CODE`].
pub const FIRST_TIME_PERCENTAGE: u32 = 10;

/// Multi-buy tiers: (group size, percentage points), most generous first.
pub const MULTI_BUY_TIERS: [(i64, u32); 2] = [(5, 20), (3, 10)];

/// Volume tiers: (subtotal threshold, fraction, description), highest first.
pub const VOLUME_TIERS: [(Money, f64, &str); 2] = [
    (Money::from_cents(20000), 0.2, "-20% OVER $200"),
    (Money::from_cents(10000), 0.1, "-10% OVER $100"),
];

// =============================================================================
// Promo Codes
// =============================================================================

/// Applies promo-code discounts.
///
/// Only [`FIRST_TIME_CODE`] changes prices here; other codes pass through.
pub fn apply_promo_code_discounts<S: AsRef<str>>(
    items: Vec<LineItem>,
    promo_codes: &[S],
) -> ValidationResult<Vec<LineItem>> {
    if has_code(promo_codes, FIRST_TIME_CODE) {
        return items
            .iter()
            .map(|item| item.apply_discount(FIRST_TIME_PERCENTAGE))
            .collect();
    }
    Ok(items)
}

// =============================================================================
// Multi-Buy
// =============================================================================

/// Splits every line into tier buckets and discounts each bucket.
///
/// For each line, the largest multiple of 5 gets 20% off, the largest
/// multiple of 3 in what remains gets 10% off, and the rest keeps only the
/// discount it already had. One input line yields up to three output lines,
/// in that bucket order.
///
/// Each bucket first inherits its share of the line's existing discount
/// (`total_discount / pcs × bucket`, in floating point) before the tier
/// percentage is applied.
///
/// ## Example
/// ```text
/// pcs = 8  →  [5 @ 20%] [3 @ 10%]
/// pcs = 6  →  [5 @ 20%] [1 @ 0%]
/// pcs = 4  →  [3 @ 10%] [1 @ 0%]
/// ```
pub fn apply_multi_buy_discounts(items: Vec<LineItem>) -> ValidationResult<Vec<LineItem>> {
    let mut result = Vec::with_capacity(items.len());
    for item in &items {
        let discount_per_pcs = item.total_discount().as_f64() / item.pcs() as f64;
        let mut remaining = item.pcs();

        for (group, percentage_points) in MULTI_BUY_TIERS {
            let eligible = remaining - remaining % group;
            remaining -= eligible;
            if eligible > 0 {
                let bucket = LineItem::with_computed_discount(
                    item.product().clone(),
                    eligible,
                    discount_per_pcs * eligible as f64,
                )?;
                result.push(bucket.apply_discount(percentage_points)?);
            }
        }

        if remaining > 0 {
            result.push(LineItem::with_computed_discount(
                item.product().clone(),
                remaining,
                discount_per_pcs * remaining as f64,
            )?);
        }
    }
    Ok(result)
}

// =============================================================================
// Volume
// =============================================================================

/// Appends at most one cart-wide discount based on the subtotal of `items`.
///
/// Tiers are exclusive: a $200 subtotal gets 20%, never 20% plus 10%. The
/// amount is rounded down to the cent.
pub fn apply_volume_discounts(items: Vec<LineItem>) -> Vec<PurchaseItem> {
    let subtotal: Money = items.iter().map(LineItem::total_price).sum();
    let discount = VOLUME_TIERS
        .iter()
        .find(|(threshold, _, _)| subtotal >= *threshold)
        .map(|(_, fraction, description)| {
            Discount::new(*description, subtotal.fraction_floor(*fraction))
        });

    items
        .into_iter()
        .map(PurchaseItem::from)
        .chain(discount.map(PurchaseItem::from))
        .collect()
}

// =============================================================================
// Shipping
// =============================================================================

/// Whether shipping is free for a cart.
///
/// `raw_items` must be the cart's items before any pipeline stage ran; the
/// threshold is checked against their undiscounted-by-promotion subtotal.
pub fn qualifies_for_free_shipping<S: AsRef<str>>(raw_items: &[LineItem], promo_codes: &[S]) -> bool {
    if has_code(promo_codes, FREE_SHIPPING_CODE) {
        return true;
    }
    let subtotal: Money = raw_items.iter().map(LineItem::total_price).sum();
    subtotal >= FREE_SHIPPING_THRESHOLD
}

fn has_code<S: AsRef<str>>(promo_codes: &[S], code: &str) -> bool {
    promo_codes.iter().any(|c| c.as_ref() == code)
}
