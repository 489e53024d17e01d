//! Precision/recall scoring of a predicted edit against a reference edit.
//!
//! Scores are computed at three granularities:
//! - mentions: all mentions of both edits
//! - relations: only relations whose head and tail mentions were matched
//! - entities: only entities whose every member mention was matched
//!
//! The "considered quote" fields report which share of relations (entities)
//! survived that restriction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validator::same_tokens;
use crate::domain::{DocumentEdit, Entity, EqualityPolicy, Equivalent, Mention, Relation};
use crate::error::{ComparisonError, Result};

/// F1 scores between two edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub mention_score: f64,

    /// Share of relations whose ends were both matched
    pub considered_relation_quote: f64,

    pub relation_score: f64,

    /// Share of entities whose members were all matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub considered_entity_quote: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_score: Option<f64>,
}

/// Scores a predicted edit against a reference edit
#[derive(Debug, Clone, Copy)]
pub struct F1Engine {
    policy: EqualityPolicy,
    include_entities: bool,
}

impl Default for F1Engine {
    fn default() -> Self {
        Self::new(EqualityPolicy::default(), true)
    }
}

impl F1Engine {
    pub fn new(policy: EqualityPolicy, include_entities: bool) -> Self {
        Self {
            policy,
            include_entities,
        }
    }

    /// Compare `predicted` against `actual`
    pub fn calc_score(&self, actual: &DocumentEdit, predicted: &DocumentEdit) -> Result<ScoreResult> {
        let policy = self.policy;

        if !same_tokens(&[actual.tokens(), predicted.tokens()], policy) {
            return Err(ComparisonError::TokenSetMismatch { edit_index: 1 });
        }

        let actual_mentions: Vec<&Mention> = actual.mentions.iter().collect();
        let predicted_mentions: Vec<&Mention> = predicted.mentions.iter().collect();
        let mention_score = match_f1(&actual_mentions, &predicted_mentions, policy);

        let common_actual = matched(&actual_mentions, &predicted_mentions, policy);
        let common_predicted = matched(&predicted_mentions, &actual_mentions, policy);

        let actual_relations = relations_within(&actual.relations, &common_actual, policy);
        let predicted_relations = relations_within(&predicted.relations, &common_predicted, policy);

        let considered_relation_quote = quote(
            actual_relations.len() + predicted_relations.len(),
            actual.relations.len() + predicted.relations.len(),
        );
        let relation_score = match_f1(&actual_relations, &predicted_relations, policy);

        let (considered_entity_quote, entity_score) = if self.include_entities {
            let actual_entities = actual.entities();
            let predicted_entities = predicted.entities();

            let considered_actual = entities_within(&actual_entities, &common_actual, policy);
            let considered_predicted =
                entities_within(&predicted_entities, &common_predicted, policy);

            (
                Some(quote(
                    considered_actual.len() + considered_predicted.len(),
                    actual_entities.len() + predicted_entities.len(),
                )),
                Some(match_f1(&considered_actual, &considered_predicted, policy)),
            )
        } else {
            (None, None)
        };

        debug!(
            actual_mentions = actual_mentions.len(),
            predicted_mentions = predicted_mentions.len(),
            common = common_actual.len(),
            "f1 scored"
        );

        Ok(ScoreResult {
            mention_score,
            considered_relation_quote,
            relation_score,
            considered_entity_quote,
            entity_score,
        })
    }
}

/// F1 from list sizes and a shared true-positive count
///
/// precision = tp / actual_len, recall = tp / predicted_len; each is 0 when
/// its denominator is 0, and F1 is 0 when both are.
pub fn f1_score(actual_len: usize, predicted_len: usize, true_positives: usize) -> f64 {
    harmonic_mean(
        ratio(true_positives, actual_len),
        ratio(true_positives, predicted_len),
    )
}

/// F1 between two lists, each side counting its own matched items
///
/// Equals [`f1_score`] for lists without duplicates and stays symmetric when
/// a list repeats an item.
pub fn match_f1<T: Equivalent>(actual: &[&T], predicted: &[&T], policy: EqualityPolicy) -> f64 {
    let actual_matched = matched(actual, predicted, policy).len();
    let predicted_matched = matched(predicted, actual, policy).len();

    harmonic_mean(
        ratio(actual_matched, actual.len()),
        ratio(predicted_matched, predicted.len()),
    )
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64
    } else {
        0.0
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Share of items kept, 0 when there were none
fn quote(kept: usize, total: usize) -> f64 {
    ratio(kept, total)
}

/// Items of `items` with an equal counterpart in `others`
fn matched<'a, T: Equivalent>(items: &[&'a T], others: &[&T], policy: EqualityPolicy) -> Vec<&'a T> {
    items
        .iter()
        .copied()
        .filter(|x| others.iter().any(|o| o.equivalent(x, policy)))
        .collect()
}

/// Relations whose head and tail both appear in `mentions`
pub(crate) fn relations_within<'a>(
    relations: &'a [Relation],
    mentions: &[&Mention],
    policy: EqualityPolicy,
) -> Vec<&'a Relation> {
    let known = |m: &Mention| mentions.iter().any(|c| c.equivalent(m, policy));
    relations
        .iter()
        .filter(|r| known(&r.mention_head) && known(&r.mention_tail))
        .collect()
}

/// Entities whose member mentions all appear in `mentions`
pub(crate) fn entities_within<'a>(
    entities: &'a [Entity],
    mentions: &[&Mention],
    policy: EqualityPolicy,
) -> Vec<&'a Entity> {
    entities
        .iter()
        .filter(|e| {
            e.members()
                .iter()
                .all(|m| mentions.iter().any(|c| c.equivalent(m, policy)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f1_formula() {
        assert_eq!(f1_score(0, 0, 0), 0.0);
        assert_eq!(f1_score(4, 4, 4), 1.0);
        assert_eq!(f1_score(4, 0, 0), 0.0);

        // p = 1/2, r = 1/4
        let f1 = f1_score(2, 4, 1);
        assert!((f1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_quote_of_nothing_is_zero() {
        assert_eq!(quote(0, 0), 0.0);
        assert_eq!(quote(1, 4), 0.25);
    }
}
