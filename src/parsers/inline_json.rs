//! Stock and price embedded in storefront state blobs (`<script>{...}</script>`).
//!
//! Two shapes are recognised. Objects keyed by the product SKU carrying
//! `isOnStock` and a `price: {centAmount, fractionDigits, currencyCode}`, and
//! commerce "variant" objects with per-channel availability and a `prices` list.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use super::price::price_from_minor_units;

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("Invalid script selector"));

const DEFAULT_FRACTION_DIGITS: u64 = 2;
const PREFERRED_PRICE_COUNTRY: &str = "US";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStock {
    pub in_stock: Option<bool>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
}

pub fn extract_inline_stock(document: &Html, sku: Option<&str>) -> Option<InlineStock> {
    for script in document.select(&SCRIPT_SELECTOR) {
        let text = script.text().collect::<String>();
        let text = text.trim();
        if !(text.starts_with('{') || text.starts_with('[')) {
            continue;
        }
        let Ok(data) = serde_json::from_str::<Value>(text) else {
            continue;
        };

        if let Some(sku) = sku {
            let mut candidates = Vec::new();
            collect_sku_objects(&data, sku, &mut candidates);
            // Prefer objects that carry a price, then ones with a stock flag.
            candidates.sort_by_key(|obj| {
                (
                    !obj.contains_key("price") && !obj.contains_key("prices"),
                    !obj.contains_key("isOnStock") && !obj.contains_key("availableQuantity"),
                )
            });
            if let Some(obj) = candidates.first() {
                return Some(stock_from_sku_object(obj));
            }
        }

        if let Some(variant) = find_variant(&data) {
            return Some(stock_from_variant(variant));
        }
    }

    None
}

fn collect_sku_objects<'a>(data: &'a Value, sku: &str, out: &mut Vec<&'a Map<String, Value>>) {
    match data {
        Value::Object(obj) => {
            if obj.get("sku").and_then(Value::as_str) == Some(sku) {
                out.push(obj);
            }
            for value in obj.values() {
                collect_sku_objects(value, sku, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_sku_objects(item, sku, out);
            }
        }
        _ => {}
    }
}

fn find_variant(data: &Value) -> Option<&Map<String, Value>> {
    match data {
        Value::Object(obj) => {
            if let Some(Value::Object(variant)) = obj.get("masterVariant") {
                if variant.contains_key("availability") || variant.contains_key("prices") {
                    return Some(variant);
                }
            }
            if ["availability", "prices", "sku"].iter().all(|k| obj.contains_key(*k)) {
                return Some(obj);
            }
            obj.values().find_map(find_variant)
        }
        Value::Array(items) => items.iter().find_map(find_variant),
        _ => None,
    }
}

fn stock_from_sku_object(obj: &Map<String, Value>) -> InlineStock {
    let (price, currency) = match obj.get("price") {
        Some(Value::Object(money)) => money_value(money),
        _ => (None, None),
    };

    InlineStock {
        in_stock: obj.get("isOnStock").map(truthy),
        price,
        currency,
    }
}

fn stock_from_variant(variant: &Map<String, Value>) -> InlineStock {
    let channels = variant
        .get("availability")
        .and_then(|a| a.get("channels"))
        .and_then(Value::as_object)
        .filter(|channels| !channels.is_empty());

    let in_stock = channels.map(|channels| {
        channels.values().any(|channel| {
            channel.get("isOnStock").map(truthy).unwrap_or(false)
                && channel
                    .get("availableQuantity")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0)
                    > 0.0
        })
    });

    let (price, currency) = variant
        .get("prices")
        .and_then(Value::as_array)
        .and_then(|prices| {
            prices
                .iter()
                .find(|p| p.get("country").and_then(Value::as_str) == Some(PREFERRED_PRICE_COUNTRY))
                .or_else(|| prices.first())
        })
        .and_then(|entry| entry.get("value"))
        .and_then(Value::as_object)
        .map(money_value)
        .unwrap_or((None, None));

    InlineStock {
        in_stock,
        price,
        currency,
    }
}

fn money_value(money: &Map<String, Value>) -> (Option<Decimal>, Option<String>) {
    let currency = money
        .get("currencyCode")
        .and_then(Value::as_str)
        .map(str::to_string);
    let fraction_digits = match money.get("fractionDigits") {
        None => Some(DEFAULT_FRACTION_DIGITS),
        Some(value) => value.as_u64(),
    };
    let price = match (money.get("centAmount").and_then(Value::as_i64), fraction_digits) {
        (Some(amount), Some(digits)) => u32::try_from(digits)
            .ok()
            .and_then(|digits| price_from_minor_units(amount, digits)),
        _ => None,
    };
    (price, currency)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
    }
}
