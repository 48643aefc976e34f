//! # Command Scripts
//!
//! A script is a JSON document listing cart operations in order. Each
//! operation mirrors one storefront route.
//!
//! ## Format
//! ```json
//! {
//!   "cart": "demo",
//!   "steps": [
//!     { "op": "addProduct", "sku": "CHEAPSUIT", "name": "Blue Suit",
//!       "regularPrice": 29900, "salePrice": 14950 },
//!     { "op": "addProduct", "sku": "SOCKS", "name": "Socks", "regularPrice": 500, "pcs": 3 },
//!     { "op": "addPromoCode", "code": "FIRSTTIME" },
//!     { "op": "updateShipping", "service": "UPS Ground", "address": "30 W 21st St" },
//!     { "op": "purchase", "format": "json" },
//!     { "op": "clearCart" }
//!   ]
//! }
//! ```
//!
//! `cart` is optional at both levels: a step's own `cart` wins, then the
//! script's, then a freshly generated identifier shared by the whole run.

use std::io::Read;

use serde::Deserialize;
use testmart_core::ShippingService;

use crate::config::OutputFormat;
use crate::error::AppError;

/// A sequence of cart operations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Cart used by steps that don't name one
    #[serde(default)]
    pub cart: Option<String>,

    pub steps: Vec<Step>,
}

/// One operation, optionally aimed at a specific cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub cart: Option<String>,

    #[serde(flatten)]
    pub operation: Operation,
}

/// Cart operations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    /// Adds `pcs` pieces of a product (default 1)
    AddProduct {
        sku: String,
        name: String,
        regular_price: i64,
        #[serde(default)]
        sale_price: Option<i64>,
        #[serde(default = "default_pcs")]
        pcs: i64,
    },

    /// Removes a product whatever its count
    RemoveProduct { sku: String },

    /// Replaces the count of a product
    UpdateCount { sku: String, pcs: i64 },

    AddPromoCode { code: String },

    RemovePromoCode { code: String },

    /// Sets the shipping service and address; unknown services fail to parse
    UpdateShipping {
        service: ShippingService,
        address: String,
    },

    /// Prices the cart and prints it
    Purchase {
        #[serde(default)]
        format: Option<OutputFormat>,
    },

    /// Deletes the cart
    ClearCart,
}

fn default_pcs() -> i64 {
    1
}

impl Operation {
    /// Name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddProduct { .. } => "addProduct",
            Operation::RemoveProduct { .. } => "removeProduct",
            Operation::UpdateCount { .. } => "updateCount",
            Operation::AddPromoCode { .. } => "addPromoCode",
            Operation::RemovePromoCode { .. } => "removePromoCode",
            Operation::UpdateShipping { .. } => "updateShipping",
            Operation::Purchase { .. } => "purchase",
            Operation::ClearCart => "clearCart",
        }
    }
}

impl Script {
    /// Parses a script from JSON text.
    pub fn parse(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a script from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
