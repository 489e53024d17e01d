//! Mentions, entities and relations asserted by an edit.

use serde::{Deserialize, Serialize};

use super::document::Token;
use super::equivalence::{contains_equivalent, EqualityPolicy};

/// A tagged span of tokens, optionally linked to a coreference entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Label of the span (e.g. "ORG", "Actor")
    pub tag: String,

    /// Tokens covered by the span
    pub tokens: Vec<Token>,

    /// Coreference cluster this mention belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

impl Mention {
    pub fn new(tag: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            tag: tag.into(),
            tokens,
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Whether the span covers a token equal to `token`
    pub fn contains_token(&self, token: &Token, policy: EqualityPolicy) -> bool {
        contains_equivalent(&self.tokens, token, policy)
    }

    /// Id of the linked entity, if any
    pub fn entity_id(&self) -> Option<i64> {
        self.entity.as_ref().map(|e| e.id)
    }
}

/// A coreference cluster
///
/// On input an entity is usually just an id. Member mentions are only
/// materialized by [`entities_with_mentions`] for entity-level scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<Mention>>,
}

impl Entity {
    pub fn new(id: i64) -> Self {
        Self { id, mentions: None }
    }

    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = Some(mentions);
        self
    }

    /// Materialized member mentions (empty when not reconstructed)
    pub fn members(&self) -> &[Mention] {
        self.mentions.as_deref().unwrap_or(&[])
    }
}

/// A directed, tagged edge between two mentions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub tag: String,

    pub mention_head: Mention,

    pub mention_tail: Mention,
}

impl Relation {
    pub fn new(tag: impl Into<String>, head: Mention, tail: Mention) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            mention_head: head,
            mention_tail: tail,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Rebuild entities from the mentions that link to them
///
/// Linked mentions are grouped by entity id. Entities appear in the order
/// their first mention appears; unlinked mentions are skipped.
pub fn entities_with_mentions(mentions: &[Mention]) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();

    for mention in mentions {
        let Some(id) = mention.entity_id() else {
            continue;
        };

        match entities.iter_mut().find(|e| e.id == id) {
            Some(entity) => entity.mentions.get_or_insert_with(Vec::new).push(mention.clone()),
            None => entities.push(Entity::new(id).with_mentions(vec![mention.clone()])),
        }
    }

    entities
}
