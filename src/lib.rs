//! # Repertorium
//!
//! A repertory builder and materia medica search engine for homeopathic
//! reference texts.
//!
//! Repertorium turns flat-text reference material into two queryable
//! structures: a hierarchical repertory (category → symptom → graded
//! remedies) persisted as a JSON artifact, and an in-memory full-text
//! block index over free-text materia medica sources with ranked
//! substring search.
//!
//! ## Architecture
//!
//! ```text
//! offline batch                      runtime query
//! ┌────────────┐   ┌────────────┐    ┌──────────┐   ┌──────────┐
//! │ raw export │──▶│  Parser    │    │ Fetcher  │──▶│  Block   │
//! │  (lines)   │   │ + grading  │    │ HTTP/file│   │  Indexer │
//! └────────────┘   └─────┬──────┘    └──────────┘   └────┬─────┘
//!                        ▼                               ▼
//!                 ┌────────────┐                  ┌────────────┐
//!                 │ repertory  │──▶ Compactor     │   Ranked   │
//!                 │  artifact  │    (bounded)     │   Search   │
//!                 └────────────┘                  └────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rpt build                     # raw export → repertory.json
//! rpt compact                   # bounded artifact for distribution
//! rpt search "throbbing"        # ranked materia medica search
//! rpt sources                   # source reachability
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`parser`] | Source line parsing and artifact assembly |
//! | [`grade`] | Pluggable grading strategies |
//! | [`repertory`] | Two-key composite repertory index |
//! | [`compact`] | Order-preserving artifact truncation |
//! | [`fetch`] | Per-source document retrieval |
//! | [`index`] | Paragraph-block indexing |
//! | [`label`] | Best-effort remedy-label detection |
//! | [`search`] | Ranked substring search engine |

pub mod compact;
pub mod config;
pub mod fetch;
pub mod grade;
pub mod index;
pub mod ingest;
pub mod label;
pub mod models;
pub mod parser;
pub mod repertory;
pub mod search;
pub mod sources;
