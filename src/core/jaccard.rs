//! Set-overlap indices across several edits.
//!
//! The Jaccard index of N lists is |intersection| / |union|, where both
//! sets are built under semantic equality: the intersection holds every
//! distinct value present in all lists, the union every distinct value
//! present in any list.
//!
//! Two aggregates are reported:
//! - `combined`: one pass over all edits at once
//! - `average`: the combined computation for each pair of edits, averaged

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::f1::{entities_within, relations_within};
use super::validator::validate_edits;
use crate::domain::{distinct, DocumentEdit, Entity, EqualityPolicy, Equivalent, Mention, Relation};
use crate::error::Result;

/// Weight of the relation and entity components in the combined index
pub const STRUCTURE_WEIGHT: f64 = 0.5;

/// Overlap indices for one group of edits
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JaccardScore {
    pub mention_index: f64,
    pub relation_index: f64,

    /// Relations restricted to those between commonly annotated mentions
    pub considered_relation_index: f64,

    pub entity_index: f64,

    /// Entities restricted to those made of commonly annotated mentions
    pub considered_entities_index: f64,

    pub combined_index: f64,
}

impl JaccardScore {
    /// Build a score from its components, deriving `combined_index`
    pub fn from_components(
        mention_index: f64,
        relation_index: f64,
        considered_relation_index: f64,
        entity_index: f64,
        considered_entities_index: f64,
    ) -> Self {
        Self {
            mention_index,
            relation_index,
            considered_relation_index,
            entity_index,
            considered_entities_index,
            combined_index: combined_index(
                mention_index,
                considered_relation_index,
                considered_entities_index,
            ),
        }
    }

    /// Field-wise arithmetic mean; `combined_index` is recomputed from the
    /// averaged components rather than averaged itself
    pub fn mean(scores: &[JaccardScore]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let n = scores.len() as f64;
        let avg = |field: fn(&JaccardScore) -> f64| scores.iter().map(field).sum::<f64>() / n;

        Self::from_components(
            avg(|s| s.mention_index),
            avg(|s| s.relation_index),
            avg(|s| s.considered_relation_index),
            avg(|s| s.entity_index),
            avg(|s| s.considered_entities_index),
        )
    }
}

/// (mention + w * considered relations + w * considered entities) / 2
pub fn combined_index(
    mention_index: f64,
    considered_relation_index: f64,
    considered_entities_index: f64,
) -> f64 {
    (mention_index
        + STRUCTURE_WEIGHT * considered_relation_index
        + STRUCTURE_WEIGHT * considered_entities_index)
        / 2.0
}

/// Combined and pairwise-averaged indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JaccardResult {
    pub combined: JaccardScore,
    pub average: JaccardScore,
}

/// Distinct values present in every list
pub fn intersection<'a, T: Equivalent>(lists: &[Vec<&'a T>], policy: EqualityPolicy) -> Vec<&'a T> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };

    distinct(first.iter().copied(), policy)
        .into_iter()
        .filter(|x| rest.iter().all(|list| list.iter().any(|y| y.equivalent(x, policy))))
        .collect()
}

/// Distinct values present in any list
pub fn union<'a, T: Equivalent>(lists: &[Vec<&'a T>], policy: EqualityPolicy) -> Vec<&'a T> {
    distinct(lists.iter().flat_map(|list| list.iter().copied()), policy)
}

/// |intersection| / |union|, 0 when the union is empty
pub fn jaccard_index<T: Equivalent>(lists: &[Vec<&T>], policy: EqualityPolicy) -> f64 {
    let union_size = union(lists, policy).len();
    if union_size == 0 {
        return 0.0;
    }
    intersection(lists, policy).len() as f64 / union_size as f64
}

/// Computes Jaccard indices over edits
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardEngine {
    policy: EqualityPolicy,
}

impl JaccardEngine {
    pub fn new(policy: EqualityPolicy) -> Self {
        Self { policy }
    }

    /// Combined and pairwise-averaged indices for at least two edits
    pub fn calculate(&self, edits: &[DocumentEdit]) -> Result<JaccardResult> {
        validate_edits(edits, self.policy)?;

        let all: Vec<&DocumentEdit> = edits.iter().collect();
        let combined = self.score(&all);

        let mut pair_scores = Vec::new();
        for i in 0..edits.len() {
            for j in (i + 1)..edits.len() {
                pair_scores.push(self.score(&[&edits[i], &edits[j]]));
            }
        }
        let average = JaccardScore::mean(&pair_scores);

        debug!(
            edits = edits.len(),
            pairs = pair_scores.len(),
            combined = combined.combined_index,
            average = average.combined_index,
            "jaccard calculated"
        );

        Ok(JaccardResult { combined, average })
    }

    /// Indices for one group of edits, without precondition checks
    pub fn score(&self, edits: &[&DocumentEdit]) -> JaccardScore {
        let policy = self.policy;

        let mentions: Vec<Vec<&Mention>> = edits.iter().map(|e| e.mentions.iter().collect()).collect();
        let common_mentions = intersection(&mentions, policy);

        let relations: Vec<Vec<&Relation>> =
            edits.iter().map(|e| e.relations.iter().collect()).collect();
        let considered_relations: Vec<Vec<&Relation>> = edits
            .iter()
            .map(|e| relations_within(&e.relations, &common_mentions, policy))
            .collect();

        let entities: Vec<Vec<Entity>> = edits.iter().map(|e| e.entities()).collect();
        let entity_refs: Vec<Vec<&Entity>> = entities.iter().map(|l| l.iter().collect()).collect();
        let considered_entities: Vec<Vec<&Entity>> = entities
            .iter()
            .map(|l| entities_within(l, &common_mentions, policy))
            .collect();

        JaccardScore::from_components(
            jaccard_index(&mentions, policy),
            jaccard_index(&relations, policy),
            jaccard_index(&considered_relations, policy),
            jaccard_index(&entity_refs, policy),
            jaccard_index(&considered_entities, policy),
        )
    }
}

/// Result of comparing the tag vocabularies of two edits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub similarity: f64,
}

/// Jaccard index of the distinct mention tags used by two edits
///
/// Only labels are compared, not spans; 0 when neither edit has mentions.
pub fn tag_similarity(a: &DocumentEdit, b: &DocumentEdit) -> SimilarityResult {
    let tags = |edit: &DocumentEdit| -> HashSet<String> {
        edit.mentions.iter().map(|m| m.tag.clone()).collect()
    };
    let (ours, theirs) = (tags(a), tags(b));

    let total = ours.union(&theirs).count();
    let similarity = if total == 0 {
        0.0
    } else {
        ours.intersection(&theirs).count() as f64 / total as f64
    };

    SimilarityResult { similarity }
}
