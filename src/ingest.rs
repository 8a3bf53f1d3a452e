//! Batch build: raw symptom export → repertory artifact.
//!
//! A single pass over the source text; malformed lines never abort the
//! build. Only the surrounding I/O is fatal.

use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::grade::PseudoRandomGrading;
use crate::parser::SourceParser;

/// `rpt build`: read the raw export, build the artifact, write it as JSON,
/// print summary counts.
pub fn run_build(config: &Config) -> Result<()> {
    let input = &config.build.source;
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read source file: {}", input.display()))?;

    let mut parser = SourceParser::new(Box::new(PseudoRandomGrading::new()));
    let matched = parser.parse_text(&text);
    let artifact = parser.finish();
    info!(
        matched,
        total = artifact.metadata.total_lines,
        "source pass complete"
    );

    let json = serde_json::to_string_pretty(&artifact)?;
    let output = &config.build.artifact;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, json)
        .with_context(|| format!("Failed to write repertory artifact: {}", output.display()))?;

    println!("build repertory");
    println!("  remedies: {}", artifact.metadata.total_remedies);
    println!("  symptoms: {}", artifact.metadata.total_symptoms);
    println!("  lines: {}", artifact.metadata.total_lines);
    println!("  categories: {}", artifact.metadata.total_categories);
    println!("ok");
    Ok(())
}
