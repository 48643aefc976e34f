//! # Script Runner
//!
//! Executes a [`Script`] against a [`CartStore`], writing each purchase to
//! the output as it is priced.
//!
//! ## Step Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each step                                                          │
//! │     │                                                                   │
//! │     ├─► resolve cart id (step → script → generated)                     │
//! │     ├─► validate input (product, count, selection)                      │
//! │     ├─► lock cart, apply mutation or price it                           │
//! │     └─► purchase? write receipt / JSON                                  │
//! │                                                                         │
//! │  first failing step stops the run: "step N (op): message"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use testmart_core::{Product, ProductInput, Purchase, ShippingSelection};
use tracing::{debug, info};

use crate::config::{CliConfig, OutputFormat};
use crate::error::AppError;
use crate::script::{Operation, Script};
use crate::store::CartStore;

/// Runs scripts against a cart store.
#[derive(Debug)]
pub struct Runner<'a> {
    store: &'a CartStore,
    config: &'a CliConfig,
}

impl<'a> Runner<'a> {
    pub fn new(store: &'a CartStore, config: &'a CliConfig) -> Self {
        Runner { store, config }
    }

    /// Executes every step in order. Returns how many steps ran.
    pub fn run<W: Write>(&self, script: &Script, out: &mut W) -> Result<usize, AppError> {
        let default_cart = script.cart.clone().unwrap_or_else(CartStore::new_cart_id);
        info!(cart_id = %default_cart, steps = script.steps.len(), "running script");

        for (index, step) in script.steps.iter().enumerate() {
            let cart_id = step.cart.as_deref().unwrap_or(&default_cart);
            let op = step.operation.name();
            debug!(step = index + 1, op, cart_id = %cart_id, "executing step");

            let output = self
                .apply(cart_id, &step.operation)
                .map_err(|e| e.at_step(index, op))?;
            if let Some(output) = output {
                writeln!(out, "{}", output)?;
            }
        }

        Ok(script.steps.len())
    }

    /// Applies one operation; returns printable output for purchases.
    fn apply(&self, cart_id: &str, operation: &Operation) -> Result<Option<String>, AppError> {
        match operation {
            Operation::AddProduct {
                sku,
                name,
                regular_price,
                sale_price,
                pcs,
            } => {
                let product = Product::try_from(ProductInput {
                    sku: sku.clone(),
                    name: name.clone(),
                    regular_price: *regular_price,
                    sale_price: *sale_price,
                })?;
                self.store
                    .with_cart_mut(cart_id, |cart| cart.add_product_pcs(product, *pcs).map(|_| ()))?;
            }
            Operation::RemoveProduct { sku } => {
                self.store.with_cart_mut(cart_id, |cart| {
                    cart.remove_product(sku);
                });
            }
            Operation::UpdateCount { sku, pcs } => {
                self.store
                    .with_cart_mut(cart_id, |cart| cart.update_count(sku, *pcs).map(|_| ()))?;
            }
            Operation::AddPromoCode { code } => {
                self.store.with_cart_mut(cart_id, |cart| {
                    cart.add_promo_code(code.as_str());
                });
            }
            Operation::RemovePromoCode { code } => {
                self.store.with_cart_mut(cart_id, |cart| {
                    cart.remove_promo_code(code);
                });
            }
            Operation::UpdateShipping { service, address } => {
                let selection = ShippingSelection::new(*service, address.as_str())?;
                self.store.with_cart_mut(cart_id, |cart| {
                    cart.update_shipping(selection);
                });
            }
            Operation::Purchase { format } => {
                let purchase = self.store.with_cart(cart_id, |cart| cart.to_purchase())??;
                let format = format.unwrap_or(self.config.output);
                info!(
                    cart_id = %cart_id,
                    total = purchase.total_price().cents(),
                    "purchase priced"
                );
                return Ok(Some(self.render(&purchase, format)?));
            }
            Operation::ClearCart => {
                self.store.remove(cart_id);
            }
        }
        Ok(None)
    }

    fn render(&self, purchase: &Purchase, format: OutputFormat) -> Result<String, AppError> {
        match format {
            OutputFormat::Text => Ok(purchase.receipt(&self.config.store_name)),
            OutputFormat::Json if self.config.pretty_json => {
                Ok(serde_json::to_string_pretty(purchase)?)
            }
            OutputFormat::Json => Ok(serde_json::to_string(purchase)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::Arc;
    use testmart_core::{FixedQuoter, Money};

    fn run(script: &str, config: &CliConfig) -> Result<String, AppError> {
        let store = CartStore::default();
        run_with(&store, script, config)
    }

    fn run_with(store: &CartStore, script: &str, config: &CliConfig) -> Result<String, AppError> {
        let script = Script::parse(script)?;
        let mut out = Vec::new();
        Runner::new(store, config).run(&script, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn compact_json() -> CliConfig {
        CliConfig {
            output: OutputFormat::Json,
            pretty_json: false,
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_shirt_and_suit_json() {
        let output = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "50DOLLARSHIRT", "name": "Retro Designer T-shirt",
                  "regularPrice": 5000 },
                { "op": "addProduct", "sku": "CHEAPSUIT", "name": "Blue Two-Piece Suit",
                  "regularPrice": 29900, "salePrice": 14950 },
                { "op": "updateShipping", "service": "UPS Ground", "address": "NYC" },
                { "op": "purchase" }
            ] }"#,
            &compact_json(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(json["totals"]["price"], 17955);
        assert_eq!(json["totals"]["shipping"], 0);
        assert_eq!(json["totals"]["saved"], 14950);
        assert_eq!(json["discounts"][0]["description"], "-10% OVER $100");
        assert_eq!(json["items"][1]["sku"], "CHEAPSUIT");
    }

    #[test]
    fn test_text_receipt_uses_store_name() {
        let config = CliConfig {
            store_name: "CORNER SHOP".to_string(),
            ..CliConfig::default()
        };
        let output = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "updateShipping", "service": "USPS Priority Mail", "address": "NYC" },
                { "op": "purchase" }
            ] }"#,
            &config,
        )
        .unwrap();

        assert!(output.contains("CORNER SHOP"));
        assert!(output.contains("Total:"));
        assert!(output.contains("$11.00"));
    }

    #[test]
    fn test_step_format_overrides_config() {
        let output = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "addPromoCode", "code": "FREESHIP" },
                { "op": "updateShipping", "service": "UPS Ground", "address": "NYC" },
                { "op": "purchase", "format": "json" }
            ] }"#,
            &CliConfig::default(),
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["totals"]["price"], 100);
    }

    #[test]
    fn test_mutations_flow_through() {
        let output = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "TEE", "name": "Tee", "regularPrice": 2000 },
                { "op": "addProduct", "sku": "TEE", "name": "Tee", "regularPrice": 2000, "pcs": 2 },
                { "op": "addProduct", "sku": "CAP", "name": "Cap", "regularPrice": 1500 },
                { "op": "removeProduct", "sku": "CAP" },
                { "op": "addPromoCode", "code": "FIRSTTIME" },
                { "op": "removePromoCode", "code": "FIRSTTIME" },
                { "op": "updateCount", "sku": "TEE", "pcs": 5 },
                { "op": "updateShipping", "service": "UPS Ground", "address": "NYC" },
                { "op": "purchase" }
            ] }"#,
            &compact_json(),
        )
        .unwrap();

        // 5 tees at 20% off = 8000, free shipping, no volume discount
        let json: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
        assert_eq!(json["items"][0]["pcs"], 5);
        assert_eq!(json["totals"]["saved"], 2000);
        assert_eq!(json["totals"]["price"], 8000);
    }

    #[test]
    fn test_steps_target_their_own_cart() {
        let store = CartStore::new(Arc::new(FixedQuoter(Money::from_cents(500))));
        run_with(
            &store,
            r#"{ "cart": "a", "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100, "cart": "b" }
            ] }"#,
            &CliConfig::default(),
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.with_cart("a", |c| c.count("GUM")).unwrap(), Some(1));
        assert_eq!(store.with_cart("b", |c| c.count("GUM")).unwrap(), Some(1));
    }

    #[test]
    fn test_failing_step_is_reported() {
        let err = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "addProduct", "sku": "", "name": "Nothing", "regularPrice": 100 }
            ] }"#,
            &CliConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "step 2 (addProduct): Invalid sku: \"\" (string)");
    }

    #[test]
    fn test_purchase_without_shipping_fails() {
        let err = run(
            r#"{ "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "purchase" }
            ] }"#,
            &CliConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("step 2 (purchase)"));
    }

    #[test]
    fn test_cleared_cart_cannot_be_purchased() {
        let err = run(
            r#"{ "cart": "demo", "steps": [
                { "op": "addProduct", "sku": "GUM", "name": "Gum", "regularPrice": 100 },
                { "op": "clearCart" },
                { "op": "purchase" }
            ] }"#,
            &CliConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CartNotFound);
        assert_eq!(err.message, "step 3 (purchase): Cart not found: demo");
    }
}
