//! Ranked substring search over the materia medica block index.
//!
//! Scoring: a match anywhere in a block's label+snippet earns a large base
//! score minus the character offset of the first occurrence, so earlier
//! matches rank higher; a query that also appears in the block's remedy
//! label earns a fixed bonus on top, so direct remedy-name hits outrank
//! incidental prose matches.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{Config, SourceConfig};
use crate::fetch::{fetch_all, DefaultFetcher, SourceFetcher};
use crate::index::{BlockIndex, LabelFn};
use crate::label::detect_label;
use crate::models::{MateriaBlock, SearchHit};

const MATCH_BASE: i64 = 1_000_000;
const LABEL_BONUS: i64 = 1_000_000;

/// Failure taxonomy for the search runtime. Zero matches is an empty `Ok`,
/// never an error; this enum covers the genuinely fatal path so callers
/// can render "data unavailable" and "no results" as different states.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No source ever loaded, so there is nothing to search.
    #[error("materia medica index unavailable: no source loaded (failed: {})", .failed.join(", "))]
    IndexUnavailable { failed: Vec<String> },
}

/// Process-scoped search engine over the block index.
///
/// The index is built lazily on the first query and cached for the life of
/// the engine; [`SearchEngine::rebuild`] is the only way to refresh it.
pub struct SearchEngine {
    sources: Vec<SourceConfig>,
    fetcher: Arc<dyn SourceFetcher>,
    timeout_secs: u64,
    final_limit: usize,
    labeler: LabelFn,
    cache: RwLock<Option<Arc<BlockIndex>>>,
}

impl SearchEngine {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.sources.clone(),
            Arc::new(DefaultFetcher::new(config.fetch.timeout_secs)?),
            config.fetch.timeout_secs,
            config.retrieval.final_limit,
        ))
    }

    pub fn new(
        sources: Vec<SourceConfig>,
        fetcher: Arc<dyn SourceFetcher>,
        timeout_secs: u64,
        final_limit: usize,
    ) -> Self {
        Self {
            sources,
            fetcher,
            timeout_secs,
            final_limit,
            labeler: detect_label,
            cache: RwLock::new(None),
        }
    }

    /// Swap the labeling strategy (defaults to [`detect_label`]).
    pub fn with_labeler(mut self, labeler: LabelFn) -> Self {
        self.labeler = labeler;
        self
    }

    /// The full block index, building and caching it on first use.
    pub async fn index(&self) -> Result<Arc<BlockIndex>, SearchError> {
        if let Some(index) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(index));
        }
        self.rebuild().await
    }

    /// Discard any cached index and build a fresh one from the sources.
    /// A build where no source loads is not cached, so a later call can
    /// succeed once sources recover.
    pub async fn rebuild(&self) -> Result<Arc<BlockIndex>, SearchError> {
        let (documents, failed) =
            fetch_all(Arc::clone(&self.fetcher), &self.sources, self.timeout_secs).await;
        if documents.is_empty() {
            return Err(SearchError::IndexUnavailable { failed });
        }
        let index = Arc::new(BlockIndex::build(&documents, failed, self.labeler));
        info!(
            blocks = index.blocks.len(),
            loaded = index.loaded.len(),
            failed = index.failed.len(),
            "materia medica index built"
        );
        *self.cache.write().await = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Ranked literal-substring search. An empty or whitespace-only query
    /// yields an empty result list.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.index().await?;
        Ok(rank_blocks(
            &index.blocks,
            &query,
            limit.unwrap_or(self.final_limit),
        ))
    }
}

/// Score and rank blocks against an already-normalized query.
fn rank_blocks(blocks: &[MateriaBlock], query: &str, limit: usize) -> Vec<SearchHit> {
    let mut scored: Vec<(i64, &MateriaBlock)> = blocks
        .iter()
        .filter_map(|block| score_block(block, query).map(|score| (score, block)))
        .collect();

    // Ties break on content rather than load order, so result order does
    // not depend on which source happened to be fetched first.
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.snippet.cmp(&b.1.snippet))
            .then_with(|| a.1.source.cmp(&b.1.source))
            .then_with(|| a.1.index.cmp(&b.1.index))
    });
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(_, block)| SearchHit {
            source: block.source.clone(),
            remedy: block.remedy.clone(),
            snippet: block.snippet.clone(),
            index: block.index,
        })
        .collect()
}

fn score_block(block: &MateriaBlock, query: &str) -> Option<i64> {
    let haystack = match &block.remedy {
        Some(label) => format!("{} {}", label, block.snippet).to_lowercase(),
        None => block.snippet.to_lowercase(),
    };
    let byte_offset = haystack.find(query)?;
    let char_offset = haystack[..byte_offset].chars().count() as i64;

    let mut score = MATCH_BASE - char_offset;
    if let Some(label) = &block.remedy {
        if label.to_lowercase().contains(query) {
            score += LABEL_BONUS;
        }
    }
    Some(score)
}

/// `rpt search`: run one query against the configured sources and print
/// the ranked results.
pub async fn run_search(config: &Config, query: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let engine = SearchEngine::from_config(config)?;
    let hits = engine.search(query, limit).await?;

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let remedy = hit.remedy.as_deref().unwrap_or("(unlabeled)");
        println!("{}. {} [{} #{}]", i + 1, remedy, hit.source, hit.index);
        println!("    excerpt: \"{}\"", hit.snippet);
        println!();
    }
    Ok(())
}
