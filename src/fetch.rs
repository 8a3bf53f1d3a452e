//! Source document retrieval.
//!
//! Materia medica sources are fetched by identifier, each independently:
//! the loader fans out one task per source and joins on all-settled, so a
//! failing or slow source is excluded from the index without blocking or
//! failing the others.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::warn;

use crate::config::SourceConfig;

/// Fetches the full text of one source document by location.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Default transport: HTTP(S) via reqwest, anything else as a local file.
pub struct DefaultFetcher {
    client: reqwest::Client,
}

impl DefaultFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for DefaultFetcher {
    async fn fetch(&self, location: &str) -> Result<String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let response = self
                .client
                .get(location)
                .send()
                .await
                .with_context(|| format!("Failed to fetch source: {}", location))?
                .error_for_status()
                .with_context(|| format!("Source returned an error status: {}", location))?;
            Ok(response.text().await?)
        } else {
            tokio::fs::read_to_string(location)
                .await
                .with_context(|| format!("Failed to read source file: {}", location))
        }
    }
}

/// Fetch every configured source concurrently, joining on all-settled.
/// Returns `(id, text)` pairs for the successes and the ids of the
/// failures, both in configured source order.
pub async fn fetch_all(
    fetcher: Arc<dyn SourceFetcher>,
    sources: &[SourceConfig],
    timeout_secs: u64,
) -> (Vec<(String, String)>, Vec<String>) {
    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        let fetcher = Arc::clone(&fetcher);
        let location = source.location.clone();
        let handle = tokio::spawn(async move {
            timeout(Duration::from_secs(timeout_secs), async move {
                fetcher.fetch(&location).await
            })
            .await
        });
        handles.push((source.id.clone(), handle));
    }

    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for (id, handle) in handles {
        match handle.await {
            Ok(Ok(Ok(text))) => loaded.push((id, text)),
            Ok(Ok(Err(error))) => {
                warn!(source = %id, error = %error, "source fetch failed");
                failed.push(id);
            }
            Ok(Err(_)) => {
                warn!(source = %id, timeout_secs, "source fetch timed out");
                failed.push(id);
            }
            Err(error) => {
                warn!(source = %id, error = %error, "source fetch task aborted");
                failed.push(id);
            }
        }
    }
    (loaded, failed)
}
