use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Unexpected page structure at {url}: {message}")]
    Parse { url: String, message: String },

    #[error("State store unavailable ({path}): {message}")]
    StoreUnavailable { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification failed: {0}")]
    Notify(String),
}

impl MonitorError {
    pub fn fetch(url: &str, message: impl ToString) -> Self {
        MonitorError::Fetch {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(url: &str, message: impl ToString) -> Self {
        MonitorError::Parse {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn store(path: &Path, message: impl ToString) -> Self {
        MonitorError::StoreUnavailable {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Errors that abort the run instead of being recovered per product.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::StoreUnavailable { .. } | MonitorError::Config(_)
        )
    }
}

impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        MonitorError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
