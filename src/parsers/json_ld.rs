use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("Invalid JSON-LD selector")
});

/// Offer fields of the first schema.org `Product` found on the page, as written there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductOffer {
    pub availability: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
}

/// All JSON-LD objects on the page; top-level arrays and `@graph` lists are flattened.
pub fn extract_json_ld(document: &Html) -> Vec<Value> {
    let mut items = Vec::new();

    for script in document.select(&JSON_LD_SELECTOR) {
        let text = script.text().collect::<String>();
        if text.trim().is_empty() {
            continue;
        }

        let raw: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        match raw {
            Value::Array(entries) => items.extend(entries.into_iter().filter(Value::is_object)),
            Value::Object(mut obj) => {
                if let Some(Value::Array(graph)) = obj.remove("@graph") {
                    items.extend(graph.into_iter().filter(Value::is_object));
                }
                if !obj.is_empty() {
                    items.push(Value::Object(obj));
                }
            }
            _ => {}
        }
    }

    items
}

pub fn product_offer(items: &[Value]) -> Option<ProductOffer> {
    let product = items.iter().find(|entry| is_product(entry))?;

    let offers = match product.get("offers") {
        Some(Value::Array(list)) => list.first(),
        Some(other) => Some(other),
        None => None,
    };

    let Some(offer) = offers else {
        return Some(ProductOffer::default());
    };

    Some(ProductOffer {
        availability: offer.get("availability").and_then(scalar_to_string),
        price: offer.get("price").and_then(scalar_to_string),
        currency: offer.get("priceCurrency").and_then(scalar_to_string),
    })
}

fn is_product(entry: &Value) -> bool {
    match entry.get("@type") {
        Some(Value::String(kind)) => kind == "Product",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("Product")),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
