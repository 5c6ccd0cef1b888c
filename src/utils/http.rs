use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HttpSettings;
use crate::error::{MonitorError, Result};

/// Retrieves the raw body of a product page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub fn create_client(settings: &HttpSettings) -> Result<Client> {
    ClientBuilder::new()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .cookie_store(true)
        .build()
        .map_err(|e| MonitorError::Config(format!("failed to build HTTP client: {}", e)))
}

/// One GET per call; the next cycle is the retry.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MonitorError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP error {}: {}", status, url);
            return Err(MonitorError::fetch(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| MonitorError::fetch(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        let settings = HttpSettings {
            user_agent: "stock-monitor-test".to_string(),
            timeout_seconds: 5,
        };
        HttpFetcher::new(create_client(&settings).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/20123"))
            .and(header("user-agent", "stock-monitor-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetcher()
            .fetch(&format!("{}/p/20123", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch(&format!("{}/p/1", server.uri()))
            .await
            .unwrap_err();
        match err {
            MonitorError::Fetch { message, .. } => assert!(message.contains("503")),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let err = fetcher().fetch("http://127.0.0.1:9/p/1").await.unwrap_err();
        assert!(matches!(err, MonitorError::Fetch { .. }));
    }
}
