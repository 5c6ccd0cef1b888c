pub mod inline_json;
pub mod json_ld;
pub mod page;
pub mod price;

pub use price::*;

use html_escape::decode_html_entities;
use scraper::Html;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::models::{Product, ProductSnapshot};

/// Turns a fetched product page into a snapshot.
pub trait PageParser: Send + Sync {
    fn parse(&self, html: &str, product: &Product) -> Result<ProductSnapshot>;
}

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heuristic parser for storefront product pages.
///
/// Structured data wins over markup: JSON-LD offers first, then inline
/// storefront JSON, then the buy button label and finally page text.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlProductParser;

impl HtmlProductParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for HtmlProductParser {
    fn parse(&self, html: &str, product: &Product) -> Result<ProductSnapshot> {
        let document = Html::parse_document(html);

        let offer = json_ld::product_offer(&json_ld::extract_json_ld(&document)).unwrap_or_default();
        let mut price = offer.price.as_deref().and_then(parse_amount);
        let mut currency = offer.currency.clone();
        let mut available = None;

        if offer.availability.is_none() && offer.price.is_none() {
            let sku = product.sku();
            if let Some(inline) = inline_json::extract_inline_stock(&document, sku.as_deref()) {
                debug!("{}: using inline storefront JSON", product.name);
                available = inline.in_stock;
                price = inline.price.or(price);
                currency = inline.currency.or(currency);
            }
        }

        if available.is_none() {
            available = page::availability_from_buy_button(&document);
        }

        if let Some(from_schema) = offer.availability.as_deref().and_then(page::availability_from_schema) {
            available = Some(from_schema);
        }

        if available.is_none() {
            available = page::availability_from_page_text(&document);
        }

        if price.is_none() {
            price = page::price_from_markup(&document);
        }
        if currency.is_none() {
            currency = page::currency_from_meta(&document);
        }

        if available.is_none() && price.is_none() {
            return Err(MonitorError::parse(
                &product.url,
                "no availability or price found",
            ));
        }

        debug!(
            "{}: available={:?} price={:?} currency={:?}",
            product.name, available, price, currency
        );

        Ok(ProductSnapshot {
            available: available.unwrap_or(false),
            price,
            currency,
        })
    }
}
