//! # testmart-core: Pure Pricing Logic for TestMart Checkout
//!
//! Turns a shopping cart into a priced purchase: promotions, multi-buy
//! tiers, volume discounts, shipping and the printable receipt. Nothing in
//! here touches the disk or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TestMart Checkout                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    testmart-cli                                 │   │
//! │  │    command scripts ──► cart store ──► receipt / JSON output     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ testmart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  product  │  │   cart    │  │ pipeline  │  │ purchase  │  │   │
//! │  │   │ line_item │  │ shipping  │  │  stages   │  │  receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • INTEGER CENTS • TYPED ERRORS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer cents
//! - [`product`] - Catalog products with optional sale price
//! - [`line_item`] - Line items, cart-wide discounts, purchase entries
//! - [`shipping`] - Services, selections, quotes and quoters
//! - [`pipeline`] - The discount stages and the free-shipping rule
//! - [`cart`] - The mutable shopping cart
//! - [`purchase`] - Priced result, JSON summary and receipt
//! - [`validation`] - Field checks shared by every constructor
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use testmart_core::{Product, ShippingSelection, ShippingService, ShoppingCart};
//!
//! let mut cart = ShoppingCart::default();
//! cart.add_product(Product::new("SHIRT", "Retro T-shirt", 2500, None).unwrap())
//!     .unwrap();
//! cart.add_promo_code("FIRSTTIME");
//! cart.update_shipping(
//!     ShippingSelection::new(ShippingService::UspsPriorityMail, "30 W 21st Street").unwrap(),
//! );
//!
//! let purchase = cart.to_purchase().unwrap();
//!
//! // $25.00 - 10% + $10.00 flat shipping
//! assert_eq!(purchase.total_price().cents(), 3250);
//! assert_eq!(purchase.total_discount().cents(), 250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod line_item;
pub mod money;
pub mod pipeline;
pub mod product;
pub mod purchase;
pub mod shipping;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::ShoppingCart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use line_item::{Discount, LineItem, PurchaseItem};
pub use money::Money;
pub use product::{Product, ProductInput};
pub use purchase::{Purchase, PurchaseSummary};
pub use shipping::{
    FixedQuoter, FlatRateQuoter, ShippingQuote, ShippingQuoter, ShippingSelection, ShippingService,
};
