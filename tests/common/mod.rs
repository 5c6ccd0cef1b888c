#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, Once};
use tracing_subscriber::{fmt, EnvFilter};

use stock_monitor::detector::ChangeEvent;
use stock_monitor::discord::Notifier;
use stock_monitor::error::{MonitorError, Result};
use stock_monitor::models::{Product, ProductId, ProductSnapshot, StoredState};
use stock_monitor::storage::StateStore;
use stock_monitor::utils::PageFetcher;

static INIT: Once = Once::new();

/// Captured per test; shown for failing tests or with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stock_monitor=debug"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn product(id: &str) -> Product {
    Product::new(id, format!("https://shop.example/p/{}", id), format!("Product {}", id))
}

pub fn price(value: i64) -> Option<Decimal> {
    Some(Decimal::new(value, 0))
}

/// Minimal product page carrying a schema.org offer.
pub fn product_page(available: bool, price: Option<i64>) -> String {
    let availability = if available { "InStock" } else { "OutOfStock" };
    let price = price
        .map(|p| format!(r#", "price": "{}""#, p))
        .unwrap_or_default();
    format!(
        r#"<html><head><script type="application/ld+json">
        {{"@type": "Product", "offers": {{"availability": "https://schema.org/{}"{}}}}}
        </script></head><body></body></html>"#,
        availability, price
    )
}

#[derive(Default)]
pub struct MemoryStore {
    pub state: Mutex<StoredState>,
    pub fail_load: bool,
    pub saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_state(state: StoredState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Default::default()
        }
    }

    pub fn snapshot(&self, id: &str) -> Option<ProductSnapshot> {
        self.state.lock().unwrap().get(&ProductId::from(id)).cloned()
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<StoredState> {
        if self.fail_load {
            return Err(MonitorError::StoreUnavailable {
                path: "memory".to_string(),
                message: "corrupt".to_string(),
            });
        }
        Ok(self.state.lock().unwrap().clone())
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        *self.state.lock().unwrap() = state.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

/// Serves canned pages by URL; unknown URLs fail like a network error.
#[derive(Default)]
pub struct FakeFetcher {
    pub pages: Mutex<HashMap<String, String>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn serve(&self, product: &Product, html: String) {
        self.pages.lock().unwrap().insert(product.url.clone(), html);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| MonitorError::fetch(url, "connection refused"))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(ProductId, ChangeEvent)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(ProductId, ChangeEvent)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        product: &Product,
        event: &ChangeEvent,
        _snapshot: &ProductSnapshot,
    ) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((product.id.clone(), event.clone()));
        if self.fail {
            Err(MonitorError::Notify("webhook returned 500".to_string()))
        } else {
            Ok(())
        }
    }
}
