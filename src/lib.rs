//! editscore - Agreement and quality scoring for annotated document edits
//!
//! Several annotators (or a model and a reference) annotate the same
//! tokenized document with mentions, entities and relations. editscore
//! compares those edits.
//!
//! # Architecture
//!
//! All comparisons run under one notion of semantic equality:
//! - Tokens, mentions, entities and relations are compared structurally
//! - The comparison rules are picked by an `EqualityPolicy`
//! - Every engine validates its preconditions before computing anything
//!
//! # Modules
//!
//! - `domain`: Data structures (Token, Mention, Entity, Relation, DocumentEdit)
//! - `core`: Engines (Heatmap, F1, Jaccard) and the precondition validator
//! - `config`: Policy configuration from file and environment
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Per-token disagreement between annotators
//! editscore heatmap --input edits.json
//!
//! # Score a prediction against a reference
//! editscore f1 --input pair.json --pretty
//!
//! # Agreement across many annotators
//! cat edits.json | editscore jaccard
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;

// Re-export main types at crate root for convenience
pub use crate::core::{F1Engine, Heatmap, HeatmapEngine, JaccardEngine, JaccardResult, ScoreResult};
pub use crate::domain::{DocumentEdit, Entity, EqualityPolicy, Equivalent, Mention, Relation, Token};
pub use crate::error::{ComparisonError, Result};
