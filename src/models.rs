//! Core data models shared by the batch builder and the search runtime.
//!
//! The artifact-facing types serialize with camelCase keys because the
//! persisted repertory JSON is read by existing browsing code; key names
//! like `totalSymptoms` are part of that contract.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::repertory::RepertoryIndex;

/// One symptom reference held by a remedy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRef {
    pub id: u32,
    pub category: String,
    pub description: String,
    pub source: String,
}

/// A remedy and every symptom it was cited for during one build.
///
/// Invariant: `total_symptoms == symptoms.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remedy {
    pub name: String,
    pub abbreviation: String,
    pub symptoms: Vec<SymptomRef>,
    pub total_symptoms: usize,
}

/// One remedy reference held by a symptom record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedyRef {
    pub remedy: String,
    pub id: u32,
    pub source: String,
}

/// A symptom record, keyed in the artifact by its normalized
/// `(category, description)` composite.
///
/// Invariant: `total_remedies == remedies.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub category: String,
    pub description: String,
    pub remedies: Vec<RemedyRef>,
    pub total_remedies: usize,
}

/// A graded repertory entry. The grade is in `1..=3` and is assigned once,
/// at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedRef {
    pub remedy: String,
    pub id: u32,
    pub source: String,
    pub grade: u8,
}

/// Build metadata embedded in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: String,
    pub created_at: String,
    pub total_remedies: usize,
    pub total_symptoms: usize,
    pub total_lines: usize,
    pub total_categories: usize,
    pub sources: Vec<String>,
}

/// Immutable snapshot produced by the batch builder and consumed read-only
/// downstream. Top-level JSON keys are `metadata`, `remedies`, `symptoms`,
/// `repertory`, `categories`; a missing key fails deserialization rather
/// than silently yielding an empty view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepertoryArtifact {
    pub metadata: Metadata,
    pub remedies: IndexMap<String, Remedy>,
    pub symptoms: IndexMap<String, Symptom>,
    pub repertory: RepertoryIndex,
    pub categories: Vec<String>,
}

/// A paragraph block of materia medica text, the atomic searchable unit.
/// Unique by `(source, index)`; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MateriaBlock {
    pub source: String,
    pub remedy: Option<String>,
    pub snippet: String,
    pub index: usize,
}

/// A ranked search hit returned to callers. Scores are internal and not
/// exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub source: String,
    pub remedy: Option<String>,
    pub snippet: String,
    pub index: usize,
}
