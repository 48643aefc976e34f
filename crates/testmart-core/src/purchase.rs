//! # Purchase
//!
//! The priced result of a cart: line items, cart-wide discounts and the
//! shipping quote, ready for the review step of checkout.
//!
//! ## Presentation Order
//! Line items first, by SKU; cart-wide discounts last, smallest first. Both
//! the JSON summary and the receipt use this order.
//!
//! ## Receipt Layout
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                     TESTMART                     │
//! │                                                  │
//! │ Shirt                                          1 │
//! │ SHIRT                                     $25.00 │
//! │                                           $25.00 │
//! │                                                  │
//! │ You saved:                              (-$0.00) │
//! │ ...                                              │
//! └──────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::line_item::PurchaseItem;
use crate::money::Money;
use crate::shipping::ShippingQuote;

/// Header printed at the top of a receipt unless the caller picks another.
pub const DEFAULT_RECEIPT_HEADER: &str = "TESTMART";

/// Interior width of the receipt box, in characters.
pub const RECEIPT_WIDTH: usize = 50;

// =============================================================================
// Purchase
// =============================================================================

/// A pending purchase with every discount applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    items: Vec<PurchaseItem>,
    shipping: ShippingQuote,
}

impl Purchase {
    /// Assembles a purchase from priced items and a shipping quote.
    pub fn new(items: Vec<PurchaseItem>, shipping: ShippingQuote) -> Self {
        Purchase { items, shipping }
    }

    /// Assembles a purchase when the quote may be missing.
    ///
    /// A missing quote is an error; shipping never silently defaults to free.
    pub fn try_new(items: Vec<PurchaseItem>, shipping: Option<ShippingQuote>) -> CoreResult<Self> {
        let shipping = shipping.ok_or(CoreError::MissingShippingQuote)?;
        Ok(Purchase::new(items, shipping))
    }

    /// Items in the order they were priced.
    #[inline]
    pub fn items(&self) -> &[PurchaseItem] {
        &self.items
    }

    /// Items in presentation order.
    pub fn sorted_items(&self) -> Vec<&PurchaseItem> {
        let mut items: Vec<&PurchaseItem> = self.items.iter().collect();
        items.sort_by(|a, b| presentation_order(a, b));
        items
    }

    #[inline]
    pub fn shipping(&self) -> &ShippingQuote {
        &self.shipping
    }

    /// Shipping cost after free-shipping rules.
    #[inline]
    pub fn shipping_cost(&self) -> Money {
        self.shipping.cost()
    }

    /// Sum of the line items' discounts.
    ///
    /// Cart-wide discounts are itemized separately and are not part of this
    /// figure; it is what the receipt reports as "You saved".
    pub fn total_discount(&self) -> Money {
        self.items
            .iter()
            .filter_map(PurchaseItem::as_line)
            .map(|item| item.total_discount())
            .sum()
    }

    /// Line totals, minus cart-wide discounts, plus shipping.
    pub fn total_price(&self) -> Money {
        let goods: Money = self
            .items
            .iter()
            .map(|item| match item {
                PurchaseItem::Line(line) => line.total_price(),
                PurchaseItem::Discount(discount) => Money::zero() - discount.total_discount(),
            })
            .sum();
        goods + self.shipping.cost()
    }

    /// Structured form of this purchase.
    pub fn summary(&self) -> PurchaseSummary {
        let sorted = self.sorted_items();
        PurchaseSummary {
            items: sorted
                .iter()
                .filter_map(|item| item.as_line())
                .map(|item| LineItemSummary {
                    sku: item.sku().to_string(),
                    description: item.description(),
                    pcs: item.pcs(),
                    discount: item.total_discount(),
                    price: item.total_price(),
                })
                .collect(),
            discounts: sorted
                .iter()
                .filter_map(|item| item.as_discount())
                .map(|discount| DiscountSummary {
                    description: discount.description().to_string(),
                    discount: discount.total_discount(),
                })
                .collect(),
            totals: TotalsSummary {
                saved: self.total_discount(),
                shipping: self.shipping_cost(),
                price: self.total_price(),
            },
        }
    }

    /// Renders a fixed-width receipt under the given header.
    pub fn receipt(&self, header: &str) -> String {
        let mut receipt = ReceiptWriter::new(RECEIPT_WIDTH);
        receipt.top_line();
        receipt.center(header);
        receipt.center("");
        for item in self.sorted_items() {
            match item {
                PurchaseItem::Line(line) => {
                    let before_discounts = line.total_price() + line.total_discount();
                    receipt.spread(&line.description(), &line.pcs().to_string());
                    receipt.spread(line.sku(), &before_discounts.to_string());
                    if line.total_discount().is_positive() {
                        receipt.spread("Discount:", &format!("(-{})", line.total_discount()));
                    }
                    receipt.spread("", &line.total_price().to_string());
                }
                PurchaseItem::Discount(discount) => {
                    receipt.spread(
                        discount.description(),
                        &format!("(-{})", discount.total_discount()),
                    );
                }
            }
            receipt.center("");
        }
        receipt.spread("You saved:", &format!("(-{})", self.total_discount()));
        receipt.center("");
        receipt.spread("Shipping:", &self.shipping_cost().to_string());
        receipt.spread("Total:", &self.total_price().to_string());
        receipt.center("");
        receipt.bottom_line();
        receipt.finish()
    }
}

fn presentation_order(a: &PurchaseItem, b: &PurchaseItem) -> Ordering {
    match (a, b) {
        (PurchaseItem::Line(a), PurchaseItem::Line(b)) => a.sku().cmp(b.sku()),
        (PurchaseItem::Line(_), PurchaseItem::Discount(_)) => Ordering::Less,
        (PurchaseItem::Discount(_), PurchaseItem::Line(_)) => Ordering::Greater,
        (PurchaseItem::Discount(a), PurchaseItem::Discount(b)) => {
            a.total_discount().cmp(&b.total_discount())
        }
    }
}

/// The receipt under [`DEFAULT_RECEIPT_HEADER`].
impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.receipt(DEFAULT_RECEIPT_HEADER))
    }
}

/// Serializes as [`PurchaseSummary`].
impl Serialize for Purchase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.summary().serialize(serializer)
    }
}

// =============================================================================
// Structured Output
// =============================================================================

/// JSON shape of a purchase.
///
/// ```json
/// {
///   "items": [{ "sku": "SHIRT", "description": "Shirt", "pcs": 1, "discount": 0, "price": 2500 }],
///   "discounts": [{ "description": "-10% OVER $100", "discount": 1000 }],
///   "totals": { "saved": 0, "shipping": 500, "price": 3000 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PurchaseSummary {
    pub items: Vec<LineItemSummary>,
    pub discounts: Vec<DiscountSummary>,
    pub totals: TotalsSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LineItemSummary {
    pub sku: String,
    pub description: String,
    pub pcs: i64,
    pub discount: Money,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct DiscountSummary {
    pub description: String,
    pub discount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TotalsSummary {
    pub saved: Money,
    pub shipping: Money,
    pub price: Money,
}

// =============================================================================
// Receipt Writer
// =============================================================================

struct ReceiptWriter {
    width: usize,
    lines: Vec<String>,
}

impl ReceiptWriter {
    fn new(width: usize) -> Self {
        ReceiptWriter {
            width,
            lines: Vec::new(),
        }
    }

    fn top_line(&mut self) {
        self.lines.push(format!("┌{}┐", "─".repeat(self.width)));
    }

    fn bottom_line(&mut self) {
        self.lines.push(format!("└{}┘", "─".repeat(self.width)));
    }

    fn center(&mut self, text: &str) {
        let left = self.width / 2 + text.chars().count() / 2;
        let right = self.width.saturating_sub(left);
        self.lines
            .push(format!("│ {:>left$}{:>right$}", text, " │", left = left, right = right));
    }

    fn spread(&mut self, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count() + 2;
        let padding = " ".repeat(self.width.saturating_sub(used));
        self.lines.push(format!("│ {}{}{} │", left, padding, right));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}
