//! Document fetching
//!
//! Every piece of I/O the pipeline performs goes through [`Fetch`]. A location
//! is either a remote address (`http://` / `https://`) or a local path.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Fetches the raw text of a document
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Return the UTF-8 content found at `location`
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Whether `location` should be fetched over the network
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches remote documents with `reqwest` and local ones from the filesystem
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: reqwest::Client,
    allow_local: bool,
}

impl SourceFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            allow_local: true,
        })
    }

    /// Allow or refuse local filesystem locations
    pub fn allow_local(mut self, allow: bool) -> Self {
        self.allow_local = allow;
        self
    }

    async fn fetch_remote(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::fetch(url, e))?;

        response.text().await.map_err(|e| Error::fetch(url, e))
    }

    async fn fetch_local(&self, path: &str) -> Result<String> {
        if !self.allow_local {
            return Err(Error::fetch(path, "local sources are disabled"));
        }
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::fetch(path, e))
    }
}

#[async_trait]
impl Fetch for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        tracing::debug!("📥 Fetching {}", location);
        if is_remote(location) {
            self.fetch_remote(location).await
        } else {
            self.fetch_local(location).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://example.com/a.conf"));
        assert!(is_remote("https://example.com/a.conf"));
        assert!(!is_remote("/etc/zucchina/a.conf"));
        assert!(!is_remote("ftp://example.com/a.conf"));
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "DOMAIN,example.com").unwrap();

        let fetcher = SourceFetcher::new(&FetchConfig::default()).unwrap();
        let text = fetcher.fetch(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(text, "DOMAIN,example.com");
    }

    #[tokio::test]
    async fn test_local_sources_can_be_refused() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let fetcher = SourceFetcher::new(&FetchConfig::default()).unwrap().allow_local(false);
        let err = fetcher.fetch(file.path().to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("local sources are disabled"));
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let fetcher = SourceFetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.fetch("/nonexistent/zucchina/list.txt").await.unwrap_err();
        assert!(matches!(err, Error::Fetch { ref location, .. } if location == "/nonexistent/zucchina/list.txt"));
    }
}
