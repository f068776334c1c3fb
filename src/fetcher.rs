//! Page fetching
//!
//! One blocking GET per call, always with the configured client identity.
//! Without it the site serves a reduced page with no forecast cards.

use crate::config::SiteConfig;
use crate::{ForecastError, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Raw markup of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHtml(String);

impl RawHtml {
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self(body.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawHtml {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

/// Source of page markup
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<RawHtml>;
}

/// `reqwest` backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client carrying the configured user agent
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(site.user_agent.clone());
        if let Some(seconds) = site.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }
        let client = builder
            .build()
            .map_err(|e| ForecastError::network(&site.base_url, format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> Result<RawHtml> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ForecastError::network(url, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::network(url, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .map_err(|e| ForecastError::network(url, format!("Failed to read body: {e}")))?;

        info!("Fetched {} bytes from {}", body.len(), url);
        Ok(RawHtml(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer one request with `response`; the join handle yields the request head
    fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/forecast", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });
        (url, handle)
    }

    fn fetcher() -> HttpFetcher {
        let site = SiteConfig {
            timeout_seconds: Some(5),
            ..SiteConfig::default()
        };
        HttpFetcher::new(&site).unwrap()
    }

    #[test]
    fn test_client_builds_from_default_site_config() {
        let site = SiteConfig::default();
        assert!(HttpFetcher::new(&site).is_ok());
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let site = SiteConfig {
            timeout_seconds: Some(2),
            ..SiteConfig::default()
        };
        let fetcher = HttpFetcher::new(&site).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/forecast");
        assert!(matches!(result, Err(ForecastError::Network { .. })));
    }

    #[test]
    fn test_request_carries_configured_user_agent() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<html></html>",
        );

        let page = fetcher().fetch(&url).unwrap();
        let request = server.join().unwrap();

        assert_eq!(page.as_str(), "<html></html>");
        assert!(request.contains("user-agent: chrome/80.0.3987.132"));
    }

    #[test]
    fn test_error_status_is_network_error() {
        let (url, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let result = fetcher().fetch(&url);
        server.join().unwrap();

        match result {
            Err(ForecastError::Network { url: failed, message }) => {
                assert_eq!(failed, url);
                assert!(message.contains("503"));
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
