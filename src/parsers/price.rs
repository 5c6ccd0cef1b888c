use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d(?:[\d.,'\u{a0}\u{202f} ]*\d)?")
        .expect("Invalid price regex")
});

/// Parse a displayed price such as `$1,299.95`, `1.299,95 €` or `USD 2499` into an exact decimal.
///
/// A lone separator followed by exactly three digits is read as a thousands
/// separator, so `1.299` is 1299 and `12.99` is 12.99.
pub fn parse_price(price_text: &str) -> Option<Decimal> {
    let matched = PRICE_REGEX.find(price_text)?.as_str();
    let digits: String = matched
        .chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '\u{a0}' | '\u{202f}'))
        .collect();

    let normalized = match (digits.rfind('.'), digits.rfind(',')) {
        (Some(dot), Some(comma)) => {
            if dot > comma {
                digits.replace(',', "")
            } else {
                digits.replace('.', "").replace(',', ".")
            }
        }
        (Some(_), None) => normalize_single_separator(&digits, '.'),
        (None, Some(_)) => normalize_single_separator(&digits, ','),
        (None, None) => digits,
    };

    Decimal::from_str(&normalized).ok()
}

fn normalize_single_separator(digits: &str, separator: char) -> String {
    let occurrences = digits.matches(separator).count();
    let fraction_len = digits
        .rsplit(separator)
        .next()
        .map(str::len)
        .unwrap_or_default();

    if occurrences > 1 || fraction_len == 3 {
        digits.replace(separator, "")
    } else {
        digits.replace(separator, ".")
    }
}

/// Parse a machine-readable amount such as a JSON-LD `price` or a
/// `product:price:amount` meta value.
///
/// These use `.` as the decimal point, so `2.500` stays 2.5 here. Anything
/// that is not a plain number falls back to [`parse_price`].
pub fn parse_amount(amount: &str) -> Option<Decimal> {
    let trimmed = amount.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| parse_price(trimmed))
}

/// Price given as an integer amount of minor units, e.g. `{"centAmount": 129995, "fractionDigits": 2}`.
pub fn price_from_minor_units(amount: i64, fraction_digits: u32) -> Option<Decimal> {
    Decimal::try_new(amount, fraction_digits).ok()
}
