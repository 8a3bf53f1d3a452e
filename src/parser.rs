//! Source line parser and repertory artifact builder.
//!
//! Input lines follow the pattern `Remedy | Category: Description #ID |
//! Source`. Bulk exports are noisy, so a line that does not match the
//! pattern is skipped, not an error; every field of a matching line is
//! trimmed. One pass over the source text builds three views of the same
//! data — remedy records, symptom records, and the graded repertory — which
//! stay referentially consistent by construction.

use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use tracing::debug;

use crate::grade::GradeStrategy;
use crate::models::{
    GradedRef, Metadata, Remedy, RemedyRef, RepertoryArtifact, Symptom, SymptomRef,
};
use crate::repertory::RepertoryIndex;

pub struct SourceParser {
    line_re: Regex,
    remedies: IndexMap<String, Remedy>,
    symptoms: IndexMap<String, Symptom>,
    repertory: RepertoryIndex,
    grader: Box<dyn GradeStrategy>,
    source_tags: IndexSet<String>,
    total_lines: usize,
}

impl SourceParser {
    pub fn new(grader: Box<dyn GradeStrategy>) -> Self {
        Self {
            line_re: Regex::new(
                r"^\s*([^|]+?)\s*\|\s*([^|:]+?)\s*:\s*([^|]*?)\s*#(\d+)\s*\|\s*([A-Za-z]+)\s*$",
            )
            .expect("line pattern is valid"),
            remedies: IndexMap::new(),
            symptoms: IndexMap::new(),
            repertory: RepertoryIndex::new(),
            grader,
            source_tags: IndexSet::new(),
            total_lines: 0,
        }
    }

    /// Feed every line of a source document. Returns the number of lines
    /// that matched the record pattern.
    pub fn parse_text(&mut self, text: &str) -> usize {
        text.lines().filter(|line| self.parse_line(line)).count()
    }

    /// Feed one input line. Returns true when the line matched the record
    /// pattern and was folded into the build.
    pub fn parse_line(&mut self, line: &str) -> bool {
        self.total_lines += 1;

        let caps = match self.line_re.captures(line) {
            Some(caps) => caps,
            None => {
                debug!(line = %line, "skipped non-record line");
                return false;
            }
        };

        let id: u32 = match caps[4].parse() {
            Ok(id) => id,
            Err(_) => {
                debug!(line = %line, "skipped line with out-of-range id");
                return false;
            }
        };

        let remedy = caps.get(1).map_or("", |m| m.as_str());
        let category = caps.get(2).map_or("", |m| m.as_str());
        let description = caps.get(3).map_or("", |m| m.as_str());
        let source = caps.get(5).map_or("", |m| m.as_str());
        if description.is_empty() {
            debug!(line = %line, "skipped line with empty description");
            return false;
        }

        self.record(remedy, category, description, id, source);
        true
    }

    fn record(&mut self, name: &str, category: &str, description: &str, id: u32, source: &str) {
        let remedy = self.remedies.entry(name.to_string()).or_insert_with(|| Remedy {
            name: name.to_string(),
            abbreviation: abbreviate(name),
            symptoms: Vec::new(),
            total_symptoms: 0,
        });
        remedy.symptoms.push(SymptomRef {
            id,
            category: category.to_string(),
            description: description.to_string(),
            source: source.to_string(),
        });
        remedy.total_symptoms = remedy.symptoms.len();

        let key = symptom_key(category, description);
        let symptom = self.symptoms.entry(key).or_insert_with(|| Symptom {
            category: category.to_string(),
            description: description.to_string(),
            remedies: Vec::new(),
            total_remedies: 0,
        });
        symptom.remedies.push(RemedyRef {
            remedy: name.to_string(),
            id,
            source: source.to_string(),
        });
        symptom.total_remedies = symptom.remedies.len();

        // The repertory slot reuses the symptom record's display forms so
        // that lines differing only in case or spacing land in one slot.
        let slot_category = symptom.category.clone();
        let slot_description = symptom.description.clone();

        let grade = self.grader.assign(name, &slot_category, &slot_description);
        self.repertory.push(
            &slot_category,
            &slot_description,
            GradedRef {
                remedy: name.to_string(),
                id,
                source: source.to_string(),
                grade,
            },
        );

        self.source_tags.insert(source.to_string());
    }

    /// Consume the parser and produce the immutable artifact snapshot.
    pub fn finish(mut self) -> RepertoryArtifact {
        // Stable sort: ties keep the order remedies were first encountered.
        self.remedies
            .sort_by(|_, a, _, b| b.total_symptoms.cmp(&a.total_symptoms));

        let mut categories: Vec<String> = {
            let unique: IndexSet<String> = self
                .symptoms
                .values()
                .map(|s| s.category.clone())
                .collect();
            unique.into_iter().collect()
        };
        categories.sort();

        let metadata = Metadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            total_remedies: self.remedies.len(),
            total_symptoms: self.symptoms.len(),
            total_lines: self.total_lines,
            total_categories: categories.len(),
            sources: self.source_tags.into_iter().collect(),
        };

        RepertoryArtifact {
            metadata,
            remedies: self.remedies,
            symptoms: self.symptoms,
            repertory: self.repertory,
            categories,
        }
    }
}

/// Composite symptom key: case- and whitespace-normalized
/// `category|description`.
pub fn symptom_key(category: &str, description: &str) -> String {
    format!("{}|{}", normalize(category), normalize(description))
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Upper-cased first letters of each whitespace-separated word.
fn abbreviate(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}
