//! Materia medica block indexer.
//!
//! Each document is split into paragraph blocks on runs of two or more
//! consecutive blank lines (a single blank line stays inside its block).
//! Every surviving block gets a zero-based index scoped to its source, a
//! whitespace-collapsed snippet bounded to [`SNIPPET_MAX_CHARS`], and a
//! best-effort remedy label. The resulting [`BlockIndex`] is built once
//! and never mutated; reflecting new source text means rebuilding it.

use crate::models::MateriaBlock;

/// Hard cap on snippet length, in characters. Truncation does not align
/// to word boundaries.
pub const SNIPPET_MAX_CHARS: usize = 400;

/// Labeling strategy: block text → optional remedy name.
pub type LabelFn = fn(&str) -> Option<String>;

/// Split a document into paragraph blocks, trimmed, empty blocks dropped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut pending_blanks = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            pending_blanks += 1;
            continue;
        }
        if pending_blanks >= 2 && !current.is_empty() {
            flush(&mut blocks, &mut current);
        } else if pending_blanks == 1 && !current.is_empty() {
            // A lone blank line is part of the block.
            current.push("");
        }
        pending_blanks = 0;
        current.push(line);
    }
    flush(&mut blocks, &mut current);
    blocks
}

fn flush(blocks: &mut Vec<String>, current: &mut Vec<&str>) {
    if current.is_empty() {
        return;
    }
    let block = current.join("\n").trim().to_string();
    if !block.is_empty() {
        blocks.push(block);
    }
    current.clear();
}

/// Index one source document into finalized blocks, in original order.
pub fn index_source(source: &str, text: &str, labeler: LabelFn) -> Vec<MateriaBlock> {
    split_blocks(text)
        .into_iter()
        .enumerate()
        .map(|(index, block)| MateriaBlock {
            source: source.to_string(),
            remedy: labeler(&block),
            snippet: snippet_of(&block),
            index,
        })
        .collect()
}

/// Collapse internal whitespace runs to single spaces and hard-truncate.
fn snippet_of(block: &str) -> String {
    let collapsed = block.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(SNIPPET_MAX_CHARS).collect()
}

/// The in-memory block index: all sources' blocks concatenated in
/// source-list order, plus a record of which sources loaded and which
/// failed. Shared read-only for the rest of the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    pub blocks: Vec<MateriaBlock>,
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

impl BlockIndex {
    /// Build from already-fetched documents, in the given order.
    pub fn build(documents: &[(String, String)], failed: Vec<String>, labeler: LabelFn) -> Self {
        let mut blocks = Vec::new();
        let mut loaded = Vec::new();
        for (source, text) in documents {
            blocks.extend(index_source(source, text, labeler));
            loaded.push(source.clone());
        }
        Self {
            blocks,
            loaded,
            failed,
        }
    }
}
