use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ProductId;

/// Observed state of a product page at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub available: bool,
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Display only; never compared by the change detector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ProductSnapshot {
    pub fn in_stock(price: Option<Decimal>) -> Self {
        Self {
            available: true,
            price,
            currency: None,
        }
    }

    pub fn out_of_stock(price: Option<Decimal>) -> Self {
        Self {
            available: false,
            price,
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn availability_label(&self) -> &'static str {
        if self.available {
            "in stock"
        } else {
            "out of stock"
        }
    }

    pub fn price_label(&self) -> String {
        PriceLabel {
            price: self.price.as_ref(),
            currency: self.currency.as_deref(),
        }
        .to_string()
    }
}

/// Formats an optional price with its optional currency code.
pub struct PriceLabel<'a> {
    pub price: Option<&'a Decimal>,
    pub currency: Option<&'a str>,
}

impl fmt::Display for PriceLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.price, self.currency) {
            (Some(price), Some(currency)) => write!(f, "{} {}", price, currency),
            (Some(price), None) => write!(f, "{}", price),
            (None, _) => write!(f, "unknown"),
        }
    }
}

/// Last-seen snapshot per product. A missing key means "never observed".
pub type StoredState = BTreeMap<ProductId, ProductSnapshot>;
