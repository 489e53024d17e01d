//! Errors raised by the comparison engines.
//!
//! Every failure is a precondition failure: it aborts the whole operation
//! and is never retried.

use serde::Serialize;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ComparisonError>;

/// Which end of a relation failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationEnd {
    Head,
    Tail,
}

impl std::fmt::Display for RelationEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationEnd::Head => write!(f, "head"),
            RelationEnd::Tail => write!(f, "tail"),
        }
    }
}

/// Precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("Not enough edits: {required} required, {actual} supplied")]
    InsufficientEditCount { required: usize, actual: usize },

    #[error("Tokens of edit {edit_index} do not match the tokens of edit 0")]
    TokenSetMismatch { edit_index: usize },

    #[error("Relation {relation_index} of edit {edit_index} refers to an unknown {end} mention")]
    UnresolvedReference {
        edit_index: usize,
        relation_index: usize,
        end: RelationEnd,
    },
}

impl ComparisonError {
    /// Stable snake_case name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ComparisonError::InsufficientEditCount { .. } => "insufficient_edit_count",
            ComparisonError::TokenSetMismatch { .. } => "token_set_mismatch",
            ComparisonError::UnresolvedReference { .. } => "unresolved_reference",
        }
    }
}
