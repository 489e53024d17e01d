//! Domain types for edit comparison.
//!
//! This module contains:
//! - Document: Tokens, documents and the edits made over them
//! - Annotation: Mentions, entities and relations
//! - Equivalence: Semantic equality under a configurable policy
//! - Wire: Request records and reference resolution

pub mod annotation;
pub mod document;
pub mod equivalence;
pub mod wire;

// Re-export commonly used types
pub use annotation::{entities_with_mentions, Entity, Mention, Relation};
pub use document::{Document, DocumentEdit, Token};
pub use equivalence::{
    contains_equivalent, distinct, mutually_covering, EntityEquality, EqualityPolicy, Equivalent,
    TokenEquality,
};
pub use wire::{resolve_edits, EditRecord, F1Request, MentionRef, RelationRecord, SimilarityRequest};
