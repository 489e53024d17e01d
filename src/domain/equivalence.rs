//! Semantic equality for annotation values.
//!
//! Edits arrive as independently deserialized copies, so two values describe
//! "the same" token, mention, entity or relation when their identifying
//! fields agree, not when they are the same object. Every engine matches
//! through [`Equivalent`] and never through `PartialEq`.
//!
//! Two equality rules have more than one accepted form. They are selected
//! through [`EqualityPolicy`]:
//!
//! | Rule | Default | Variant |
//! |------|---------|---------|
//! | Token | `Strict`: id AND attributes | `Loose`: id OR attributes |
//! | Entity | `Id`: ids equal | `Members`: member mentions mutually covering |

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::annotation::{Entity, Mention, Relation};
use super::document::Token;

/// How two tokens are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TokenEquality {
    /// Same id and same text, document index, sentence index and POS tag
    #[default]
    Strict,

    /// Same id, or same text, document index, sentence index and POS tag
    Loose,
}

/// How two entities are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntityEquality {
    /// Caller-assigned entity ids are equal
    #[default]
    Id,

    /// Materialized member mentions cover each other
    Members,
}

/// Equality rules carried into every comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityPolicy {
    #[serde(default)]
    pub token: TokenEquality,

    #[serde(default)]
    pub entity: EntityEquality,
}

impl EqualityPolicy {
    pub fn new(token: TokenEquality, entity: EntityEquality) -> Self {
        Self { token, entity }
    }
}

/// Value equality under an [`EqualityPolicy`]
pub trait Equivalent {
    /// Whether `self` and `other` denote the same logical annotation
    fn equivalent(&self, other: &Self, policy: EqualityPolicy) -> bool;
}

impl Equivalent for Token {
    fn equivalent(&self, other: &Self, policy: EqualityPolicy) -> bool {
        let same_id = self.id == other.id;
        let same_attributes = self.text == other.text
            && self.document_index == other.document_index
            && self.sentence_index == other.sentence_index
            && self.pos_tag == other.pos_tag;

        match policy.token {
            TokenEquality::Strict => same_id && same_attributes,
            TokenEquality::Loose => same_id || same_attributes,
        }
    }
}

impl Equivalent for Mention {
    /// Entity linkage is deliberately left out; it is scored separately.
    fn equivalent(&self, other: &Self, policy: EqualityPolicy) -> bool {
        self.tag == other.tag && mutually_covering(&self.tokens, &other.tokens, policy)
    }
}

impl Equivalent for Entity {
    fn equivalent(&self, other: &Self, policy: EqualityPolicy) -> bool {
        match policy.entity {
            EntityEquality::Id => self.id == other.id,
            EntityEquality::Members => match (&self.mentions, &other.mentions) {
                (Some(ours), Some(theirs)) => mutually_covering(ours, theirs, policy),
                (None, None) => self.id == other.id,
                _ => false,
            },
        }
    }
}

impl Equivalent for Relation {
    fn equivalent(&self, other: &Self, policy: EqualityPolicy) -> bool {
        self.tag == other.tag
            && self.mention_head.equivalent(&other.mention_head, policy)
            && self.mention_tail.equivalent(&other.mention_tail, policy)
    }
}

/// Whether `items` holds a value equivalent to `item`
pub fn contains_equivalent<T: Equivalent>(items: &[T], item: &T, policy: EqualityPolicy) -> bool {
    items.iter().any(|candidate| candidate.equivalent(item, policy))
}

/// Whether every element of `a` has a counterpart in `b` and vice versa
pub fn mutually_covering<T: Equivalent>(a: &[T], b: &[T], policy: EqualityPolicy) -> bool {
    a.iter().all(|x| contains_equivalent(b, x, policy))
        && b.iter().all(|y| contains_equivalent(a, y, policy))
}

/// Distinct values of `items`, keeping the first of each equivalence class
pub fn distinct<'a, T, I>(items: I, policy: EqualityPolicy) -> Vec<&'a T>
where
    T: Equivalent + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen: Vec<&'a T> = Vec::new();
    for item in items {
        if !seen.iter().any(|s| s.equivalent(item, policy)) {
            seen.push(item);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn the() -> Token {
        Token::new(1)
            .with_text("The")
            .with_position(0, 0)
            .with_pos_tag("NN")
    }

    fn company() -> Token {
        Token::new(2)
            .with_text("company")
            .with_position(0, 0)
            .with_pos_tag("NN")
    }

    #[test]
    fn test_token_copies_are_equal() {
        let policy = EqualityPolicy::default();
        assert!(the().equivalent(&the(), policy));
        assert!(!the().equivalent(&company(), policy));
    }

    #[test]
    fn test_strict_token_requires_attributes() {
        let policy = EqualityPolicy::default();
        let retagged = the().with_pos_tag("DT");
        assert!(!the().equivalent(&retagged, policy));
        assert!(!retagged.equivalent(&the(), policy));
    }

    #[test]
    fn test_loose_token_accepts_either() {
        let policy = EqualityPolicy::new(TokenEquality::Loose, EntityEquality::Id);

        // Same id, different attributes
        assert!(the().equivalent(&the().with_pos_tag("DT"), policy));

        // Different id, same attributes
        let reused = Token {
            id: 99,
            ..the()
        };
        assert!(the().equivalent(&reused, policy));

        assert!(!the().equivalent(&company(), policy));
    }

    #[test]
    fn test_mention_ignores_entity_and_token_order() {
        let policy = EqualityPolicy::default();
        let a = Mention::new("ORG", vec![the(), company()]).with_entity(Entity::new(1));
        let b = Mention::new("ORG", vec![company(), the()]).with_entity(Entity::new(2));
        assert!(a.equivalent(&b, policy));
        assert!(b.equivalent(&a, policy));
    }

    #[test]
    fn test_mention_requires_tag_and_full_cover() {
        let policy = EqualityPolicy::default();
        let a = Mention::new("ORG", vec![the(), company()]);
        assert!(!a.equivalent(&Mention::new("PER", vec![the(), company()]), policy));
        assert!(!a.equivalent(&Mention::new("ORG", vec![company()]), policy));
    }

    #[test]
    fn test_entity_by_id() {
        let policy = EqualityPolicy::default();
        assert!(Entity::new(1).equivalent(&Entity::new(1), policy));
        assert!(!Entity::new(1).equivalent(&Entity::new(2), policy));
    }

    #[test]
    fn test_entity_by_members() {
        let policy = EqualityPolicy::new(TokenEquality::Strict, EntityEquality::Members);
        let m = Mention::new("ORG", vec![company()]);

        let a = Entity::new(1).with_mentions(vec![m.clone()]);
        let b = Entity::new(7).with_mentions(vec![m.clone()]);
        assert!(a.equivalent(&b, policy));

        // Only one side materialized
        assert!(!a.equivalent(&Entity::new(1), policy));

        // Neither side materialized falls back to ids
        assert!(Entity::new(3).equivalent(&Entity::new(3), policy));
        assert!(!Entity::new(3).equivalent(&Entity::new(4), policy));
    }

    #[test]
    fn test_relation_is_directional() {
        let policy = EqualityPolicy::default();
        let head = Mention::new("ORG", vec![company()]);
        let tail = Mention::new("DET", vec![the()]);

        let forward = Relation::new("has", head.clone(), tail.clone());
        let copy = Relation::new("has", head.clone(), tail.clone()).with_id(5);
        let backward = Relation::new("has", tail, head);

        assert!(forward.equivalent(&copy, policy));
        assert!(!forward.equivalent(&backward, policy));
    }

    #[test]
    fn test_distinct_keeps_first() {
        let policy = EqualityPolicy::default();
        let tokens = vec![the(), company(), the()];
        let unique = distinct(&tokens, policy);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, 1);
        assert_eq!(unique[1].id, 2);
    }
}
