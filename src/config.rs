use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub compact: CompactConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BuildConfig {
    /// Raw symptom export consumed by `rpt build`.
    #[serde(default = "default_build_source")]
    pub source: PathBuf,
    /// Repertory artifact written by `rpt build` and read by `rpt compact`.
    #[serde(default = "default_build_artifact")]
    pub artifact: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: default_build_source(),
            artifact: default_build_artifact(),
        }
    }
}

fn default_build_source() -> PathBuf {
    PathBuf::from("./data/symptoms.txt")
}
fn default_build_artifact() -> PathBuf {
    PathBuf::from("./data/repertory.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompactConfig {
    #[serde(default = "default_compact_output")]
    pub output: PathBuf,
    /// Symptom slots kept per category.
    #[serde(default = "default_max_symptoms")]
    pub max_symptoms_per_category: usize,
    /// Remedy entries kept per retained symptom.
    #[serde(default = "default_max_remedies")]
    pub max_remedies_per_symptom: usize,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            output: default_compact_output(),
            max_symptoms_per_category: default_max_symptoms(),
            max_remedies_per_symptom: default_max_remedies(),
        }
    }
}

fn default_compact_output() -> PathBuf {
    PathBuf::from("./data/repertory.min.json")
}
fn default_max_symptoms() -> usize {
    50
}
fn default_max_remedies() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Maximum results returned by a search.
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: default_final_limit(),
        }
    }
}

fn default_final_limit() -> usize {
    12
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Bounded wait per source; a source that exceeds it is simply absent
    /// from the index.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// One materia medica source: an identifier plus where to fetch its text.
/// Locations starting with `http://` or `https://` are fetched over HTTP;
/// anything else is read as a local file path.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub id: String,
    pub location: String,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.compact.max_symptoms_per_category == 0 {
        anyhow::bail!("compact.max_symptoms_per_category must be > 0");
    }
    if config.compact.max_remedies_per_symptom == 0 {
        anyhow::bail!("compact.max_remedies_per_symptom must be > 0");
    }
    if config.retrieval.final_limit == 0 {
        anyhow::bail!("retrieval.final_limit must be >= 1");
    }
    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be >= 1");
    }

    let mut seen = HashSet::new();
    for source in &config.sources {
        if source.id.trim().is_empty() {
            anyhow::bail!("sources entries must have a non-empty id");
        }
        if !seen.insert(source.id.as_str()) {
            anyhow::bail!("Duplicate source id: '{}'", source.id);
        }
    }

    Ok(config)
}
