//! Comparison engines.
//!
//! This module contains:
//! - Validator: Preconditions shared by all engines
//! - Heatmap: Per-token divergence across N edits
//! - F1: Precision/recall between a reference and a predicted edit
//! - Jaccard: Set-overlap indices across N edits

pub mod f1;
pub mod heatmap;
pub mod jaccard;
pub mod validator;

// Re-export commonly used types
pub use f1::{f1_score, match_f1, F1Engine, ScoreResult};
pub use heatmap::{mention_divergence, Heatmap, HeatmapEngine, ScoreAggregation, ScoredToken};
pub use jaccard::{
    combined_index, jaccard_index, tag_similarity, JaccardEngine, JaccardResult, JaccardScore,
    SimilarityResult,
};
pub use validator::{require_edit_count, same_tokens, validate_edits};
