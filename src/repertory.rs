//! Two-key composite repertory index.
//!
//! The artifact's `repertory` mapping is a three-level JSON object
//! (category → description → graded entries). Internally the index is kept
//! flat, keyed by the `(category, description)` pair, so iteration order
//! never depends on nested-map quirks; the nested shape is reconstructed
//! only at the serde boundary.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::GradedRef;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepertoryIndex {
    entries: IndexMap<(String, String), Vec<GradedRef>>,
}

impl RepertoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a graded entry under `(category, description)`, creating the
    /// slot on first use.
    pub fn push(&mut self, category: &str, description: &str, entry: GradedRef) {
        self.entries
            .entry((category.to_string(), description.to_string()))
            .or_default()
            .push(entry);
    }

    pub fn get(&self, category: &str, description: &str) -> Option<&[GradedRef]> {
        self.entries
            .get(&(category.to_string(), description.to_string()))
            .map(|v| v.as_slice())
    }

    /// Iterate `(category, description, entries)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[GradedRef])> {
        self.entries
            .iter()
            .map(|((c, d), v)| (c.as_str(), d.as_str(), v.as_slice()))
    }

    /// Number of `(category, description)` slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category-grouped view in insertion order, for browsing.
    pub fn by_category(&self) -> IndexMap<&str, Vec<(&str, &[GradedRef])>> {
        let mut grouped: IndexMap<&str, Vec<(&str, &[GradedRef])>> = IndexMap::new();
        for ((category, description), entries) in &self.entries {
            grouped
                .entry(category.as_str())
                .or_default()
                .push((description.as_str(), entries.as_slice()));
        }
        grouped
    }
}

impl Serialize for RepertoryIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut nested: IndexMap<&str, IndexMap<&str, &Vec<GradedRef>>> = IndexMap::new();
        for ((category, description), entries) in &self.entries {
            nested
                .entry(category.as_str())
                .or_default()
                .insert(description.as_str(), entries);
        }
        nested.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RepertoryIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nested: IndexMap<String, IndexMap<String, Vec<GradedRef>>> =
            IndexMap::deserialize(deserializer)?;
        let mut entries = IndexMap::new();
        for (category, symptoms) in nested {
            for (description, list) in symptoms {
                entries.insert((category.clone(), description), list);
            }
        }
        Ok(Self { entries })
    }
}
