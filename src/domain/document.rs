//! Documents, tokens and the edits made over them.

use serde::{Deserialize, Serialize};

use super::annotation::{entities_with_mentions, Entity, Mention, Relation};
use super::equivalence::{EqualityPolicy, Equivalent};

/// A single token of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Caller-assigned token id
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Position of the token in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_index: Option<i64>,

    /// Index of the sentence the token belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_tag: Option<String>,
}

impl Token {
    /// Create a token with only an id
    pub fn new(id: i64) -> Self {
        Self {
            id,
            text: None,
            document_index: None,
            sentence_index: None,
            pos_tag: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set document and sentence index
    pub fn with_position(mut self, document_index: i64, sentence_index: i64) -> Self {
        self.document_index = Some(document_index);
        self.sentence_index = Some(sentence_index);
        self
    }

    pub fn with_pos_tag(mut self, pos_tag: impl Into<String>) -> Self {
        self.pos_tag = Some(pos_tag.into());
        self
    }
}

/// The document an edit annotates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tokens in document order
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }
}

/// One annotator's (or model's) pass over a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEdit {
    pub document: Document,

    #[serde(default)]
    pub mentions: Vec<Mention>,

    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl DocumentEdit {
    /// Create an edit with no annotations
    pub fn new(document: Document) -> Self {
        Self {
            document,
            mentions: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = relations;
        self
    }

    /// Tokens of the underlying document
    pub fn tokens(&self) -> &[Token] {
        &self.document.tokens
    }

    /// Mentions spanning `token`
    pub fn mentions_of_token(&self, token: &Token, policy: EqualityPolicy) -> Vec<&Mention> {
        self.mentions
            .iter()
            .filter(|m| m.contains_token(token, policy))
            .collect()
    }

    /// Relations that have `mention` as head or tail
    pub fn relations_of_mention(&self, mention: &Mention, policy: EqualityPolicy) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|r| {
                r.mention_head.equivalent(mention, policy)
                    || r.mention_tail.equivalent(mention, policy)
            })
            .collect()
    }

    /// Entity linked to the first mention equal to `mention`
    pub fn entity_of_mention(&self, mention: &Mention, policy: EqualityPolicy) -> Option<&Entity> {
        self.mentions
            .iter()
            .find(|m| m.equivalent(mention, policy))
            .and_then(|m| m.entity.as_ref())
    }

    /// Coreference clusters of this edit, each carrying its member mentions
    pub fn entities(&self) -> Vec<Entity> {
        entities_with_mentions(&self.mentions)
    }
}
