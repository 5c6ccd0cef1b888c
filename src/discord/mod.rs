pub mod message;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

use crate::detector::ChangeEvent;
use crate::error::{MonitorError, Result};
use crate::models::{Product, ProductSnapshot};
use message::format_message;

/// Delivers one product notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        product: &Product,
        event: &ChangeEvent,
        snapshot: &ProductSnapshot,
    ) -> Result<()>;
}

/// Posts plain-text messages to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(
        &self,
        product: &Product,
        event: &ChangeEvent,
        snapshot: &ProductSnapshot,
    ) -> Result<()> {
        let payload = json!({
            "content": format_message(product, event, snapshot)
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MonitorError::Notify(format!("failed to send Discord webhook: {}", e)))?;

        if response.status().is_success() {
            info!("Sent Discord notification for {} ({})", product.name, event);
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("Discord webhook failed with status {}: {}", status, error_text);
            Err(MonitorError::Notify(format!(
                "Discord webhook failed: {} - {}",
                status, error_text
            )))
        }
    }
}

/// Used when no webhook is configured: the message only goes to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        product: &Product,
        event: &ChangeEvent,
        snapshot: &ProductSnapshot,
    ) -> Result<()> {
        info!("{}", format_message(product, event, snapshot));
        Ok(())
    }
}
