//! Drives the fetch → parse → detect → notify cycle over all configured products.

use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::detector::{detect, ChangeEvent, DetectionPolicy};
use crate::discord::Notifier;
use crate::error::Result;
use crate::models::{Product, ProductId, ProductSnapshot, StoredState};
use crate::parsers::PageParser;
use crate::storage::StateStore;
use crate::utils::PageFetcher;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSettings {
    pub policy: DetectionPolicy,
    /// Send the current status every cycle, even without a change.
    pub notify_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOutcome {
    Success(ChangeEvent),
    FetchFailed(String),
    ParseFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReport {
    pub product_id: ProductId,
    pub name: String,
    pub outcome: ProductOutcome,
    /// A notification was attempted and delivered.
    pub notified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub products: Vec<ProductReport>,
}

impl CycleReport {
    pub fn get(&self, id: &ProductId) -> Option<&ProductReport> {
        self.products.iter().find(|r| &r.product_id == id)
    }

    pub fn succeeded(&self) -> usize {
        self.products
            .iter()
            .filter(|r| matches!(r.outcome, ProductOutcome::Success(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.products.len() - self.succeeded()
    }

    pub fn notified(&self) -> usize {
        self.products.iter().filter(|r| r.notified).count()
    }
}

pub struct Scheduler {
    store: Arc<dyn StateStore>,
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
    notifier: Arc<dyn Notifier>,
    settings: CycleSettings,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn StateStore>,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
        notifier: Arc<dyn Notifier>,
        settings: CycleSettings,
    ) -> Self {
        Self {
            store,
            fetcher,
            parser,
            notifier,
            settings,
        }
    }

    /// One full pass. Product failures are isolated; only store errors abort.
    pub async fn run_once(&self, products: &[Product]) -> Result<CycleReport> {
        info!(
            "--- Starting check cycle at {} ---",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let previous = self.store.load().await?;
        let mut next = StoredState::new();
        let mut report = CycleReport::default();

        for product in products {
            let product_report = self.check_product(product, &previous, &mut next).await;
            report.products.push(product_report);
        }

        self.store.save(&next).await?;

        info!(
            "Check cycle completed: {} ok, {} failed, {} notifications sent",
            report.succeeded(),
            report.failed(),
            report.notified()
        );
        Ok(report)
    }

    async fn check_product(
        &self,
        product: &Product,
        previous: &StoredState,
        next: &mut StoredState,
    ) -> ProductReport {
        let prior = previous.get(&product.id);
        let mut report = ProductReport {
            product_id: product.id.clone(),
            name: product.name.clone(),
            outcome: ProductOutcome::Success(ChangeEvent::NoChange),
            notified: false,
        };

        let snapshot = match self.fetch_and_parse(product).await {
            Ok(snapshot) => snapshot,
            Err(outcome) => {
                // Keep the last known state so the next good fetch diffs against it.
                if let Some(prior) = prior {
                    next.insert(product.id.clone(), prior.clone());
                }
                report.outcome = outcome;
                return report;
            }
        };

        let event = detect(prior, &snapshot, self.settings.policy);
        info!(
            "{}: {}, price {} ({})",
            product.name,
            snapshot.availability_label(),
            snapshot.price_label(),
            event
        );

        if event.is_notifiable() || self.settings.notify_all {
            match self.notifier.notify(product, &event, &snapshot).await {
                Ok(()) => report.notified = true,
                Err(e) => error!("Failed to notify for {}: {}", product.name, e),
            }
        }

        next.insert(product.id.clone(), snapshot);
        report.outcome = ProductOutcome::Success(event);
        report
    }

    async fn fetch_and_parse(
        &self,
        product: &Product,
    ) -> std::result::Result<ProductSnapshot, ProductOutcome> {
        let html = self.fetcher.fetch(&product.url).await.map_err(|e| {
            warn!("Skipping {}: {}", product.name, e);
            ProductOutcome::FetchFailed(e.to_string())
        })?;

        self.parser.parse(&html, product).map_err(|e| {
            warn!("Skipping {}: {}", product.name, e);
            ProductOutcome::ParseFailed(e.to_string())
        })
    }

    /// Runs a cycle immediately, then every `every`, until `shutdown` resolves.
    ///
    /// `shutdown` is only observed between cycles; a running cycle always
    /// finishes and saves its state. Returns the number of completed cycles.
    pub async fn run_loop<F>(&self, products: &[Product], every: Duration, shutdown: F) -> Result<u64>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after {} cycles", cycles);
                    return Ok(cycles);
                }
                _ = ticker.tick() => {}
            }

            self.run_once(products).await?;
            cycles += 1;
            info!("Waiting {} seconds until the next cycle", every.as_secs());
        }
    }
}
