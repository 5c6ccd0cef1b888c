use crate::detector::ChangeEvent;
use crate::models::{
    PriceLabel, Product, ProductSnapshot, EMOJI_AVAILABLE, EMOJI_PRICE, EMOJI_STATUS,
    EMOJI_UNAVAILABLE,
};

/// Discord rejects message content longer than this.
pub const CONTENT_LIMIT: usize = 2000;

/// Human-readable notification text: headline, availability, price, then the page URL.
pub fn format_message(product: &Product, event: &ChangeEvent, snapshot: &ProductSnapshot) -> String {
    let currency = snapshot.currency.as_deref();

    let headline = match event {
        ChangeEvent::BecameAvailable => format!("{} {} is in stock", EMOJI_AVAILABLE, product.name),
        ChangeEvent::BecameUnavailable => {
            format!("{} {} is out of stock", EMOJI_UNAVAILABLE, product.name)
        }
        ChangeEvent::PriceChanged { old, new } => format!(
            "{} {} price changed: {} → {}",
            EMOJI_PRICE,
            product.name,
            PriceLabel { price: old.as_ref(), currency },
            PriceLabel { price: new.as_ref(), currency },
        ),
        ChangeEvent::NoChange => format!("{} {}", EMOJI_STATUS, product.name),
    };

    let message = format!(
        "{}\nAvailability: {}\nPrice: {}\n{}",
        headline,
        snapshot.availability_label(),
        snapshot.price_label(),
        product.url
    );

    truncate(message, CONTENT_LIMIT)
}

fn truncate(message: String, limit: usize) -> String {
    if message.chars().count() <= limit {
        return message;
    }
    let mut cut: String = message.chars().take(limit - 3).collect();
    cut.push_str("...");
    cut
}
