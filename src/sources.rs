//! Source health listing for the CLI.

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::fetch::{fetch_all, DefaultFetcher};

/// `rpt sources`: fetch every configured materia medica source once and
/// report which are reachable.
pub async fn list_sources(config: &Config) -> Result<()> {
    if config.sources.is_empty() {
        println!("(no sources configured)");
        return Ok(());
    }

    let fetcher = Arc::new(DefaultFetcher::new(config.fetch.timeout_secs)?);
    let (loaded, failed) = fetch_all(fetcher, &config.sources, config.fetch.timeout_secs).await;

    println!("{:<16} {:<10} CHARS", "SOURCE", "STATUS");
    for (id, text) in &loaded {
        println!("{:<16} {:<10} {}", id, "OK", text.chars().count());
    }
    for id in &failed {
        println!("{:<16} {:<10} -", id, "FAILED");
    }
    Ok(())
}
