use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use super::clean_text;
use super::price::{parse_amount, parse_price};

static BUY_BUTTON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("button.btn-yellow").expect("Invalid buy button selector"));

// Known price nodes on storefront product pages, most specific first.
static PRICE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"[data-testid="brow-product-price"]"#,
        r#"span[class^="ProductInformation_price__"]"#,
        r#"p[class^="ProductInfo_productPrice__"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("Invalid price selector"))
    .collect()
});

static META_PRICE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"meta[property="product:price:amount"]"#,
        r#"meta[property="og:price:amount"]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("Invalid meta price selector"))
    .collect()
});

static META_CURRENCY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="product:price:currency"]"#)
        .expect("Invalid meta currency selector")
});

/// Stock state read off the main buy button label, when the page has one.
pub fn availability_from_buy_button(document: &Html) -> Option<bool> {
    let button = document.select(&BUY_BUTTON_SELECTOR).next()?;
    let label = clean_text(&button.text().collect::<Vec<_>>().join(" ")).to_lowercase();
    availability_from_label(&label, true)
}

/// Stock state from phrases anywhere in the visible page text.
pub fn availability_from_page_text(document: &Html) -> Option<bool> {
    availability_from_label(&visible_text(document), false)
}

fn availability_from_label(label: &str, notify_means_sold_out: bool) -> Option<bool> {
    if label.contains("out of stock") {
        Some(false)
    } else if label.contains("add to cart") || label.contains("add to bag") {
        Some(true)
    } else if notify_means_sold_out && label.contains("notify") {
        Some(false)
    } else {
        None
    }
}

/// Maps schema.org availability values (`https://schema.org/InStock`, `OutOfStock`, ...).
pub fn availability_from_schema(raw: &str) -> Option<bool> {
    let lower = raw.to_lowercase();
    if lower.contains("outofstock") {
        Some(false)
    } else if lower.contains("instock") {
        Some(true)
    } else {
        None
    }
}

pub fn price_from_markup(document: &Html) -> Option<Decimal> {
    for selector in PRICE_SELECTORS.iter() {
        if let Some(node) = document.select(selector).next() {
            let text = clean_text(&node.text().collect::<String>());
            return parse_price(&text);
        }
    }

    META_PRICE_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .and_then(parse_amount)
    })
}

pub fn currency_from_meta(document: &Html) -> Option<String> {
    document
        .select(&META_CURRENCY_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Lower-cased page text without script, style and noscript contents.
pub fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name().to_string()))
            .map(|name| matches!(name.as_str(), "script" | "style" | "noscript"))
            .unwrap_or(false);
        if !hidden {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }

    clean_text(&parts.join(" ")).to_lowercase()
}
