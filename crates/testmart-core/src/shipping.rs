//! # Shipping
//!
//! Shipping services, the customer's selection, and the quote that resolves
//! a selection into a cost.
//!
//! ## Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ShippingService     USPS Priority Mail | UPS Ground | Fedex Home Del.  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ShippingSelection   service + delivery address                         │
//! │        │                                                                │
//! │        ▼  ShippingQuoter::quote()                                       │
//! │  ShippingQuote       selection + resolved cost                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_description, validate_price, ValidationResult};

// =============================================================================
// Shipping Service
// =============================================================================

/// The supported shipping services.
///
/// Parsed from and serialized as the carrier's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShippingService {
    UspsPriorityMail,
    UpsGround,
    FedexHomeDelivery,
}

impl ShippingService {
    /// Every supported service, in display order.
    pub const ALL: [ShippingService; 3] = [
        ShippingService::UspsPriorityMail,
        ShippingService::UpsGround,
        ShippingService::FedexHomeDelivery,
    ];

    /// Display name, e.g. `UPS Ground`.
    pub const fn name(&self) -> &'static str {
        match self {
            ShippingService::UspsPriorityMail => "USPS Priority Mail",
            ShippingService::UpsGround => "UPS Ground",
            ShippingService::FedexHomeDelivery => "Fedex Home Delivery",
        }
    }
}

impl fmt::Display for ShippingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShippingService {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShippingService::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| ValidationError::UnknownShippingService(s.to_string()))
    }
}

impl TryFrom<String> for ShippingService {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShippingService> for String {
    fn from(service: ShippingService) -> Self {
        service.name().to_string()
    }
}

// =============================================================================
// Shipping Selection
// =============================================================================

/// Where the purchase ships and with which service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingSelection {
    service: ShippingService,
    address: String,
}

impl ShippingSelection {
    /// Creates a selection; the address must not be blank.
    pub fn new(service: ShippingService, address: impl Into<String>) -> ValidationResult<Self> {
        let address = address.into();
        validate_description("address", &address)?;
        Ok(ShippingSelection { service, address })
    }

    #[inline]
    pub fn service(&self) -> ShippingService {
        self.service
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }
}

// =============================================================================
// Shipping Quote
// =============================================================================

/// A shipping selection with its resolved cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingQuote {
    #[serde(flatten)]
    selection: ShippingSelection,
    cost: Money,
}

impl ShippingQuote {
    /// Creates a quote; the cost must be non-negative.
    pub fn new(selection: ShippingSelection, cost: i64) -> ValidationResult<Self> {
        let cost = validate_price("cost", cost)?;
        Ok(ShippingQuote { selection, cost })
    }

    #[inline]
    pub fn selection(&self) -> &ShippingSelection {
        &self.selection
    }

    #[inline]
    pub fn service(&self) -> ShippingService {
        self.selection.service
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.selection.address
    }

    /// Shipping cost in cents.
    #[inline]
    pub fn cost(&self) -> Money {
        self.cost
    }
}

// =============================================================================
// Quoting
// =============================================================================

/// Prices a shipping selection.
///
/// Implementations must be total: every valid selection gets a cost.
pub trait ShippingQuoter: fmt::Debug + Send + Sync {
    /// Cost of shipping the given selection.
    fn quote(&self, selection: &ShippingSelection) -> Money;
}

/// Flat rate per service.
///
/// | Service             | Cost   |
/// |---------------------|--------|
/// | USPS Priority Mail  | $10.00 |
/// | UPS Ground          | $20.00 |
/// | Fedex Home Delivery | $30.00 |
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRateQuoter;

impl FlatRateQuoter {
    /// The flat rate for a service.
    pub const fn rate(service: ShippingService) -> Money {
        match service {
            ShippingService::UspsPriorityMail => Money::from_cents(1000),
            ShippingService::UpsGround => Money::from_cents(2000),
            ShippingService::FedexHomeDelivery => Money::from_cents(3000),
        }
    }
}

impl ShippingQuoter for FlatRateQuoter {
    fn quote(&self, selection: &ShippingSelection) -> Money {
        Self::rate(selection.service())
    }
}

/// Quotes the same cost for every selection. Useful when the caller wants to
/// control shipping independently of the service.
#[derive(Debug, Clone, Copy)]
pub struct FixedQuoter(pub Money);

impl ShippingQuoter for FixedQuoter {
    fn quote(&self, _selection: &ShippingSelection) -> Money {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "30 W 21st Street, New York, NY 10010";

    #[test]
    fn test_service_parses_display_names() {
        assert_eq!(
            "USPS Priority Mail".parse::<ShippingService>().unwrap(),
            ShippingService::UspsPriorityMail
        );
        assert_eq!("UPS Ground".parse::<ShippingService>().unwrap(), ShippingService::UpsGround);
        assert_eq!(
            "Fedex Home Delivery".parse::<ShippingService>().unwrap(),
            ShippingService::FedexHomeDelivery
        );
    }

    #[test]
    fn test_service_rejects_unknown_names() {
        let err = "DHL Express".parse::<ShippingService>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownShippingService(ref s) if s == "DHL Express"));
        assert!("ups ground".parse::<ShippingService>().is_err());
    }

    #[test]
    fn test_service_serde_uses_display_name() {
        let json = serde_json::to_string(&ShippingService::UpsGround).unwrap();
        assert_eq!(json, "\"UPS Ground\"");
        let parsed: ShippingService = serde_json::from_str("\"Fedex Home Delivery\"").unwrap();
        assert_eq!(parsed, ShippingService::FedexHomeDelivery);
        assert!(serde_json::from_str::<ShippingService>("\"Pony Express\"").is_err());
    }

    #[test]
    fn test_selection_requires_address() {
        assert!(ShippingSelection::new(ShippingService::UpsGround, ADDRESS).is_ok());
        let err = ShippingSelection::new(ShippingService::UpsGround, "  ").unwrap_err();
        assert_eq!(err.field(), Some("address"));
    }

    #[test]
    fn test_quote_rejects_negative_cost() {
        let selection = ShippingSelection::new(ShippingService::UpsGround, ADDRESS).unwrap();
        assert!(ShippingQuote::new(selection.clone(), -1).is_err());
        let quote = ShippingQuote::new(selection, 500).unwrap();
        assert_eq!(quote.cost(), Money::from_cents(500));
        assert_eq!(quote.service(), ShippingService::UpsGround);
        assert_eq!(quote.address(), ADDRESS);
    }

    #[test]
    fn test_flat_rates() {
        let quoter = FlatRateQuoter;
        let cost = |service| quoter.quote(&ShippingSelection::new(service, ADDRESS).unwrap());
        assert_eq!(cost(ShippingService::UspsPriorityMail).cents(), 1000);
        assert_eq!(cost(ShippingService::UpsGround).cents(), 2000);
        assert_eq!(cost(ShippingService::FedexHomeDelivery).cents(), 3000);
    }

    #[test]
    fn test_fixed_quoter_ignores_service() {
        let quoter = FixedQuoter(Money::from_cents(500));
        let selection = ShippingSelection::new(ShippingService::FedexHomeDelivery, ADDRESS).unwrap();
        assert_eq!(quoter.quote(&selection).cents(), 500);
    }
}
