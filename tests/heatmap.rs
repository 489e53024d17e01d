//! Heatmap Integration Tests
//!
//! Tests for per-token divergence scores across edits.

use editscore::core::{mention_divergence, HeatmapEngine, ScoreAggregation};
use editscore::domain::{Document, DocumentEdit, Entity, EqualityPolicy, Mention, Relation, Token};
use editscore::ComparisonError;

fn tokens() -> Vec<Token> {
    vec![
        Token::new(1).with_text("The").with_position(0, 0).with_pos_tag("DT"),
        Token::new(2).with_text("company").with_position(1, 0).with_pos_tag("NN"),
        Token::new(3).with_text("grows").with_position(2, 0).with_pos_tag("VBZ"),
    ]
}

fn the(entity: i64) -> Mention {
    Mention::new("tag1", vec![tokens()[0].clone()]).with_entity(Entity::new(entity))
}

fn company(entity: i64) -> Mention {
    Mention::new("tag2", vec![tokens()[1].clone()]).with_entity(Entity::new(entity))
}

fn edit(mentions: Vec<Mention>, relations: Vec<Relation>) -> DocumentEdit {
    DocumentEdit::new(Document::new(tokens()))
        .with_mentions(mentions)
        .with_relations(relations)
}

#[test]
fn test_identical_edits_score_zero() {
    let build = || {
        edit(
            vec![the(1), company(2)],
            vec![Relation::new("rel", the(1), company(2))],
        )
    };

    let heatmap = HeatmapEngine::default()
        .create_heatmap(&[build(), build(), build()])
        .unwrap();

    assert_eq!(heatmap.tokens.len(), 3);
    assert!(heatmap.tokens.iter().all(|t| t.score == 0.0));
    assert_eq!(heatmap.divergent().count(), 0);
}

#[test]
fn test_entity_and_relation_divergence() {
    let linked = edit(
        vec![the(1), company(2)],
        vec![Relation::new("rel", the(1), company(2))],
    );
    let unrelated = edit(vec![the(3), company(2)], Vec::new());

    let heatmap = HeatmapEngine::default()
        .create_heatmap(&[linked, unrelated])
        .unwrap();

    // Entity penalty 0.5 plus a fully missing relation (-1)
    assert_eq!(heatmap.score_of(1), Some(-0.5));
    // Same entity, relation missing
    assert_eq!(heatmap.score_of(2), Some(-1.0));
    // Unannotated token
    assert_eq!(heatmap.score_of(3), Some(0.0));
}

#[test]
fn test_missing_mentions_counted_per_pair() {
    let full = edit(vec![the(1), company(2)], Vec::new());
    let partial = edit(vec![the(1)], Vec::new());
    let empty = edit(Vec::new(), Vec::new());
    let edits = [full, partial, empty];

    let sum = HeatmapEngine::new(EqualityPolicy::default(), ScoreAggregation::Sum)
        .create_heatmap(&edits)
        .unwrap();
    // "The": only pairs with the empty edit diverge
    assert_eq!(sum.score_of(1), Some(2.0));
    // "company": both pairs against the first edit diverge
    assert_eq!(sum.score_of(2), Some(2.0));

    let mean = HeatmapEngine::new(EqualityPolicy::default(), ScoreAggregation::PairMean)
        .create_heatmap(&edits)
        .unwrap();
    assert!((mean.score_of(1).unwrap() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_input_edits_untouched() {
    let edits = vec![edit(vec![the(1)], Vec::new()), edit(Vec::new(), Vec::new())];
    let before = edits.clone();

    let heatmap = HeatmapEngine::default().create_heatmap(&edits).unwrap();

    assert_eq!(edits, before);
    let ids: Vec<i64> = heatmap.tokens.iter().map(|t| t.token.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_heatmap_requires_two_edits() {
    let err = HeatmapEngine::default()
        .create_heatmap(&[edit(Vec::new(), Vec::new())])
        .unwrap_err();

    assert_eq!(
        err,
        ComparisonError::InsufficientEditCount {
            required: 2,
            actual: 1
        }
    );
}

#[test]
fn test_mention_divergence_symmetry() {
    let policy = EqualityPolicy::default();
    let a = vec![the(1), company(2)];
    let b = vec![company(5)];
    let c = vec![the(1), the(1), company(2)];

    for (x, y) in [(&a, &b), (&a, &c), (&b, &c)] {
        assert_eq!(
            mention_divergence(x, y, policy),
            mention_divergence(y, x, policy)
        );
        assert_eq!(mention_divergence(x, x, policy), 0);
    }
}

#[test]
fn test_heatmap_serializes_flat_tokens() {
    let heatmap = HeatmapEngine::default()
        .create_heatmap(&[edit(vec![the(1)], Vec::new()), edit(Vec::new(), Vec::new())])
        .unwrap();

    let json = serde_json::to_value(&heatmap).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["text"], "The");
    assert_eq!(first["score"], 1.0);
}
