//! Deterministic, order-preserving compaction of a repertory artifact.
//!
//! Compaction is a pure truncation: each category keeps only its first N
//! symptom slots in existing iteration order, and each retained symptom's
//! remedy lists keep only their first M entries. Nothing is reordered or
//! re-scored, so compacting an already-compacted artifact with the same
//! bounds is a no-op. The operation is lossy and one-directional.

use std::collections::{HashMap, HashSet};
use std::fs;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::config::Config;
use crate::models::{RepertoryArtifact, Symptom};
use crate::parser::symptom_key;
use crate::repertory::RepertoryIndex;

/// Truncate an artifact to at most `max_symptoms` symptom slots per
/// category and `max_remedies` remedy entries per retained symptom.
/// Metadata and the category list are copied verbatim.
pub fn compact_artifact(
    artifact: &RepertoryArtifact,
    max_symptoms: usize,
    max_remedies: usize,
) -> RepertoryArtifact {
    let mut kept_per_category: HashMap<&str, usize> = HashMap::new();
    let mut kept_keys: HashSet<String> = HashSet::new();
    let mut repertory = RepertoryIndex::new();

    for (category, description, entries) in artifact.repertory.iter() {
        let kept = kept_per_category.entry(category).or_insert(0);
        if *kept >= max_symptoms {
            continue;
        }
        *kept += 1;
        kept_keys.insert(symptom_key(category, description));
        for entry in entries.iter().take(max_remedies) {
            repertory.push(category, description, entry.clone());
        }
    }

    let mut symptoms: IndexMap<String, Symptom> = IndexMap::new();
    for (key, symptom) in &artifact.symptoms {
        if !kept_keys.contains(key) {
            continue;
        }
        let mut compacted = symptom.clone();
        compacted.remedies.truncate(max_remedies);
        compacted.total_remedies = compacted.remedies.len();
        symptoms.insert(key.clone(), compacted);
    }

    RepertoryArtifact {
        metadata: artifact.metadata.clone(),
        remedies: artifact.remedies.clone(),
        symptoms,
        repertory,
        categories: artifact.categories.clone(),
    }
}

/// `rpt compact`: read the full artifact, write the bounded derivative,
/// report both file sizes.
pub fn run_compact(config: &Config) -> Result<()> {
    let input = &config.build.artifact;
    let data = fs::read_to_string(input)
        .with_context(|| format!("Failed to read repertory artifact: {}", input.display()))?;
    let before = data.len();

    // Fail fast on a structurally malformed artifact rather than emitting
    // an empty derivative.
    let artifact: RepertoryArtifact = serde_json::from_str(&data)
        .with_context(|| format!("Malformed repertory artifact: {}", input.display()))?;

    let compacted = compact_artifact(
        &artifact,
        config.compact.max_symptoms_per_category,
        config.compact.max_remedies_per_symptom,
    );

    let json = serde_json::to_string(&compacted)?;
    let output = &config.compact.output;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &json)
        .with_context(|| format!("Failed to write compacted artifact: {}", output.display()))?;

    println!("compact repertory");
    println!("  before: {:.2} MB", before as f64 / 1_048_576.0);
    println!("  after:  {:.2} MB", json.len() as f64 / 1_048_576.0);
    println!("ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::FrequencyGrading;
    use crate::parser::SourceParser;

    fn fixture() -> RepertoryArtifact {
        let mut p = SourceParser::new(Box::new(FrequencyGrading::new()));
        for line in [
            "Aconitum | Mind: Fear of death #1 | Kent",
            "Belladonna | Mind: Fear of death #2 | Kent",
            "Arsenicum Album | Mind: Fear of death #3 | Kent",
            "Aconitum | Mind: Restless sleep #4 | Kent",
            "Pulsatilla | Mind: Weeps easily #5 | Boericke",
            "Belladonna | Head: Throbbing #6 | Kent",
            "Sulphur | Head: Heat on vertex #7 | Kent",
            "Sepia | Head: Heat on vertex #8 | Allen",
        ] {
            assert!(p.parse_line(line));
        }
        p.finish()
    }

    #[test]
    fn test_bounds_are_respected() {
        let artifact = fixture();
        let compacted = compact_artifact(&artifact, 2, 2);

        let grouped = compacted.repertory.by_category();
        for (_, symptoms) in &grouped {
            assert!(symptoms.len() <= 2);
            for (_, entries) in symptoms {
                assert!(entries.len() <= 2);
            }
        }
        for symptom in compacted.symptoms.values() {
            assert!(symptom.remedies.len() <= 2);
            assert_eq!(symptom.total_remedies, symptom.remedies.len());
        }
        // Mind had three slots; the first two in iteration order survive.
        let mind: Vec<&str> = grouped["Mind"].iter().map(|(d, _)| *d).collect();
        assert_eq!(mind, vec!["Fear of death", "Restless sleep"]);
    }

    #[test]
    fn test_truncation_keeps_existing_order() {
        let artifact = fixture();
        let compacted = compact_artifact(&artifact, 10, 2);
        let entries = compacted.repertory.get("Mind", "Fear of death").unwrap();
        let remedies: Vec<&str> = entries.iter().map(|e| e.remedy.as_str()).collect();
        assert_eq!(remedies, vec!["Aconitum", "Belladonna"]);
    }

    #[test]
    fn test_metadata_and_categories_copied_verbatim() {
        let artifact = fixture();
        let compacted = compact_artifact(&artifact, 1, 1);
        assert_eq!(compacted.metadata, artifact.metadata);
        assert_eq!(compacted.categories, artifact.categories);
        assert_eq!(compacted.remedies, artifact.remedies);
    }

    #[test]
    fn test_idempotent_under_equal_bounds() {
        let artifact = fixture();
        let once = compact_artifact(&artifact, 2, 1);
        let twice = compact_artifact(&once, 2, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_output_never_exceeds_input_size() {
        let artifact = fixture();
        let compacted = compact_artifact(&artifact, 1, 1);
        let input = serde_json::to_string(&artifact).unwrap();
        let output = serde_json::to_string(&compacted).unwrap();
        assert!(output.len() <= input.len());
    }

    #[test]
    fn test_bounds_larger_than_input_change_nothing() {
        let artifact = fixture();
        let compacted = compact_artifact(&artifact, 100, 100);
        assert_eq!(compacted, artifact);
    }

    #[test]
    fn test_malformed_artifact_fails_fast() {
        let missing_repertory = r#"{
            "metadata": {
                "version": "0.0.0", "createdAt": "2024-01-01T00:00:00Z",
                "totalRemedies": 0, "totalSymptoms": 0, "totalLines": 0,
                "totalCategories": 0, "sources": []
            },
            "remedies": {},
            "symptoms": {},
            "categories": []
        }"#;
        assert!(serde_json::from_str::<RepertoryArtifact>(missing_repertory).is_err());
    }
}
