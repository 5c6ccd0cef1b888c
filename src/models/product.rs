use serde::{Deserialize, Serialize};
use std::fmt;

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId(value.to_string())
    }
}

/// A monitored product page, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub url: String,
    pub name: String,
}

impl Product {
    pub fn new(id: impl Into<String>, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ProductId(id.into()),
            url: url.into(),
            name: name.into(),
        }
    }

    /// Last non-empty path segment of the product URL.
    ///
    /// Storefronts that embed product JSON key it by this value.
    pub fn sku(&self) -> Option<String> {
        sku_from_url(&self.url)
    }
}

pub fn sku_from_url(url: &str) -> Option<String> {
    let part = url.trim_end_matches('/').rsplit('/').next()?;
    if part.is_empty() {
        None
    } else {
        Some(part.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_from_url() {
        assert_eq!(
            sku_from_url("https://shop.example/en-us/p/nikkor-z-600mm/20123/"),
            Some("20123".to_string())
        );
        assert_eq!(
            sku_from_url("https://shop.example/p/lens-abc"),
            Some("lens-abc".to_string())
        );
        assert_eq!(sku_from_url(""), None);
    }
}
