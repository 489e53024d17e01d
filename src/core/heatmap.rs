//! Per-token divergence across several edits of one document.
//!
//! Every token of the reference edit (the first one) gets a score. A score
//! of 0 means all edits annotate the token identically: the same mention
//! shapes, the same entity linkage and the same relation pattern. The
//! larger the magnitude, the more the edits disagree.
//!
//! Contributions per token, summed over all unordered edit pairs:
//! - mention divergence: mentions on the larger side without a counterpart
//! - entity divergence: [`ENTITY_PENALTY`] per matched mention pair whose
//!   entity links differ
//! - relation divergence: `(common - max) / max` per matched mention pair,
//!   a value in `[-1, 0]`

use std::borrow::Borrow;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validator::validate_edits;
use crate::domain::{DocumentEdit, EqualityPolicy, Equivalent, Mention, Token};
use crate::error::Result;

/// Score added when two matching mentions disagree on their entity
pub const ENTITY_PENALTY: f64 = 0.5;

/// How per-pair contributions are folded into one token score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAggregation {
    /// Unnormalized sum over all edit pairs
    #[default]
    Sum,

    /// Sum divided by the number of edit pairs
    PairMean,
}

/// A reference token and its divergence score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredToken {
    #[serde(flatten)]
    pub token: Token,

    pub score: f64,
}

/// Scored tokens, in the order of the reference edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Heatmap {
    pub tokens: Vec<ScoredToken>,
}

impl Heatmap {
    /// Score of the token with id `token_id`
    pub fn score_of(&self, token_id: i64) -> Option<f64> {
        self.tokens
            .iter()
            .find(|t| t.token.id == token_id)
            .map(|t| t.score)
    }

    /// Tokens with a non-zero score
    pub fn divergent(&self) -> impl Iterator<Item = &ScoredToken> {
        self.tokens.iter().filter(|t| t.score != 0.0)
    }
}

/// Builds token heatmaps
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapEngine {
    policy: EqualityPolicy,
    aggregation: ScoreAggregation,
}

impl HeatmapEngine {
    pub fn new(policy: EqualityPolicy, aggregation: ScoreAggregation) -> Self {
        Self {
            policy,
            aggregation,
        }
    }

    /// Score every token of `edits[0]`
    ///
    /// Requires at least two edits sharing the same tokens. The input edits
    /// are not modified; scores are returned alongside copies of the tokens.
    pub fn create_heatmap(&self, edits: &[DocumentEdit]) -> Result<Heatmap> {
        validate_edits(edits, self.policy)?;

        let tokens = edits[0]
            .tokens()
            .iter()
            .map(|token| ScoredToken {
                token: token.clone(),
                score: self.token_score(token, edits),
            })
            .collect::<Vec<_>>();

        debug!(
            edits = edits.len(),
            tokens = tokens.len(),
            aggregation = ?self.aggregation,
            "heatmap created"
        );

        Ok(Heatmap { tokens })
    }

    /// Divergence of a single token across `edits`
    pub fn token_score(&self, token: &Token, edits: &[DocumentEdit]) -> f64 {
        let policy = self.policy;
        let mentions_per_edit: Vec<Vec<&Mention>> = edits
            .iter()
            .map(|edit| edit.mentions_of_token(token, policy))
            .collect();

        let mut score = 0.0;
        let mut pairs = 0usize;

        for i in 0..edits.len() {
            for j in (i + 1)..edits.len() {
                pairs += 1;
                let (ours, theirs) = (&mentions_per_edit[i], &mentions_per_edit[j]);

                score += mention_divergence(ours, theirs, policy) as f64;

                for (m_i, m_j) in matching_pairs(ours, theirs, policy) {
                    score += entity_divergence(m_i, m_j, policy);
                    score += relation_divergence(m_i, &edits[i], m_j, &edits[j], policy);
                }
            }
        }

        match self.aggregation {
            ScoreAggregation::Sum => score,
            ScoreAggregation::PairMean if pairs > 0 => score / pairs as f64,
            ScoreAggregation::PairMean => 0.0,
        }
    }
}

/// Mentions of the larger list with no equal mention in the smaller one
///
/// Zero exactly when both lists hold the same mention shapes. For lists of
/// equal length the larger of the two directional counts is taken, so the
/// result does not depend on argument order.
pub fn mention_divergence<M: Borrow<Mention>>(a: &[M], b: &[M], policy: EqualityPolicy) -> usize {
    let unmatched = |from: &[M], within: &[M]| {
        from.iter()
            .filter(|x| {
                let x: &Mention = Borrow::<Mention>::borrow(*x);
                !within
                    .iter()
                    .any(|y| Borrow::<Mention>::borrow(y).equivalent(x, policy))
            })
            .count()
    };

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Greater => unmatched(a, b),
        std::cmp::Ordering::Less => unmatched(b, a),
        std::cmp::Ordering::Equal => unmatched(a, b).max(unmatched(b, a)),
    }
}

/// Every pair of equal mentions across the two lists
fn matching_pairs<'a>(
    ours: &[&'a Mention],
    theirs: &[&'a Mention],
    policy: EqualityPolicy,
) -> Vec<(&'a Mention, &'a Mention)> {
    ours.iter()
        .flat_map(|&x| {
            theirs
                .iter()
                .filter(move |y| x.equivalent(y, policy))
                .map(move |&y| (x, y))
        })
        .collect()
}

/// Penalty when exactly one side is linked or the linked entities differ
pub fn entity_divergence(a: &Mention, b: &Mention, policy: EqualityPolicy) -> f64 {
    match (&a.entity, &b.entity) {
        (None, None) => 0.0,
        (Some(x), Some(y)) if x.equivalent(y, policy) => 0.0,
        _ => ENTITY_PENALTY,
    }
}

/// Overlap of the relations attached to two matching mentions, in `[-1, 0]`
pub fn relation_divergence(
    m_i: &Mention,
    edit_i: &DocumentEdit,
    m_j: &Mention,
    edit_j: &DocumentEdit,
    policy: EqualityPolicy,
) -> f64 {
    let relations_i = edit_i.relations_of_mention(m_i, policy);
    let relations_j = edit_j.relations_of_mention(m_j, policy);

    let max = relations_i.len().max(relations_j.len());
    if max == 0 {
        return 0.0;
    }

    let common = relations_i
        .iter()
        .filter(|r| relations_j.iter().any(|o| o.equivalent(r, policy)))
        .count();

    (common as f64 - max as f64) / max as f64
}
