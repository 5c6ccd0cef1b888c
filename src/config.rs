use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

use crate::detector::DetectionPolicy;
use crate::error::{MonitorError, Result};
use crate::models::Product;

pub const ENV_PREFIX: &str = "STOCK_MONITOR";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Everything one run needs, built once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    pub products: Vec<Product>,
    pub webhook_url: Option<String>,
    pub policy: DetectionPolicy,
    pub notify_all: bool,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    products: Vec<RawProduct>,
    webhook_url: Option<String>,
    #[serde(default)]
    notify_on_unavailable: bool,
    #[serde(default)]
    notify_all: bool,
    #[serde(default)]
    http: HttpSettings,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: Option<String>,
    name: Option<String>,
    url: Option<String>,
}

impl Config {
    /// Reads the JSON config file, then applies `STOCK_MONITOR_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or_else(|| MonitorError::Config(format!("non UTF-8 config path: {}", path.display())))?;
        Self::build(File::new(path_str, FileFormat::Json))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::build(File::from_str(json, FileFormat::Json))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let raw: RawConfig = config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        if self.products.is_empty() {
            return Err(MonitorError::Config("no products configured".to_string()));
        }

        let mut products = Vec::with_capacity(self.products.len());
        let mut seen = HashSet::new();

        for (index, raw) in self.products.into_iter().enumerate() {
            let url = raw
                .url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .ok_or_else(|| MonitorError::Config(format!("product #{} has no url", index + 1)))?;

            let parsed = Url::parse(&url)
                .map_err(|e| MonitorError::Config(format!("product #{} has invalid url {}: {}", index + 1, url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(MonitorError::Config(format!(
                    "product #{} url must be http(s): {}",
                    index + 1,
                    url
                )));
            }

            let name = raw
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| url.clone());
            let id = raw
                .id
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| url.clone());

            if !seen.insert(id.clone()) {
                return Err(MonitorError::Config(format!("duplicate product id: {}", id)));
            }

            products.push(Product::new(id, url, name));
        }

        let webhook_url = self
            .webhook_url
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        if let Some(webhook) = &webhook_url {
            Url::parse(webhook)
                .map_err(|e| MonitorError::Config(format!("invalid webhook_url: {}", e)))?;
        }

        if self.http.timeout_seconds == 0 {
            return Err(MonitorError::Config("http.timeout_seconds must be positive".to_string()));
        }

        Ok(Config {
            products,
            webhook_url,
            policy: DetectionPolicy {
                notify_on_unavailable: self.notify_on_unavailable,
            },
            notify_all: self.notify_all,
            http: self.http,
        })
    }
}
