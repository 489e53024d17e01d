//! Request records as they arrive on the wire.
//!
//! A relation may name its head and tail either by index into the edit's
//! mention list or by repeating the mention inline. Resolution turns a
//! record into a [`DocumentEdit`] whose relations point at mentions that
//! exist in that same edit.

use serde::{Deserialize, Serialize};

use super::annotation::{Mention, Relation};
use super::document::{Document, DocumentEdit};
use super::equivalence::{EqualityPolicy, Equivalent};
use crate::error::{ComparisonError, RelationEnd, Result};

/// Reference from a relation to one of the edit's mentions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MentionRef {
    /// Position in the edit's `mentions`
    Index(usize),

    /// Mention repeated inline, matched by equality
    Inline(Mention),
}

/// Relation whose ends are still unresolved references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub tag: String,

    pub mention_head: MentionRef,

    pub mention_tail: MentionRef,
}

/// A document edit as submitted by a caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRecord {
    pub document: Document,

    #[serde(default)]
    pub mentions: Vec<Mention>,

    #[serde(default)]
    pub relations: Vec<RelationRecord>,
}

impl EditRecord {
    /// Resolve relation references against this edit's mentions
    ///
    /// `edit_index` is only used to locate failures in the error.
    pub fn resolve(self, edit_index: usize, policy: EqualityPolicy) -> Result<DocumentEdit> {
        let mut relations = Vec::with_capacity(self.relations.len());

        for (relation_index, record) in self.relations.iter().enumerate() {
            let locate = |end| ComparisonError::UnresolvedReference {
                edit_index,
                relation_index,
                end,
            };

            let head = lookup(&self.mentions, &record.mention_head, policy)
                .ok_or_else(|| locate(RelationEnd::Head))?;
            let tail = lookup(&self.mentions, &record.mention_tail, policy)
                .ok_or_else(|| locate(RelationEnd::Tail))?;

            relations.push(Relation {
                id: record.id,
                tag: record.tag.clone(),
                mention_head: head.clone(),
                mention_tail: tail.clone(),
            });
        }

        Ok(DocumentEdit {
            document: self.document,
            mentions: self.mentions,
            relations,
        })
    }
}

fn lookup<'a>(
    mentions: &'a [Mention],
    reference: &MentionRef,
    policy: EqualityPolicy,
) -> Option<&'a Mention> {
    match reference {
        MentionRef::Index(index) => mentions.get(*index),
        MentionRef::Inline(mention) => mentions.iter().find(|m| m.equivalent(mention, policy)),
    }
}

/// Resolve a list of edit records, in order
pub fn resolve_edits(records: Vec<EditRecord>, policy: EqualityPolicy) -> Result<Vec<DocumentEdit>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.resolve(index, policy))
        .collect()
}

/// Body of an F1 request: a reference edit and a predicted edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct F1Request {
    pub actual: EditRecord,
    pub predicted: EditRecord,
}

impl F1Request {
    /// Resolve both sides; `actual` is edit 0, `predicted` is edit 1
    pub fn resolve(self, policy: EqualityPolicy) -> Result<(DocumentEdit, DocumentEdit)> {
        Ok((
            self.actual.resolve(0, policy)?,
            self.predicted.resolve(1, policy)?,
        ))
    }
}

/// Body of a tag similarity request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityRequest {
    pub doc_edit1: EditRecord,
    pub doc_edit2: EditRecord,
}

impl SimilarityRequest {
    pub fn resolve(self, policy: EqualityPolicy) -> Result<(DocumentEdit, DocumentEdit)> {
        Ok((
            self.doc_edit1.resolve(0, policy)?,
            self.doc_edit2.resolve(1, policy)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDIT: &str = r#"{
        "document": {"id": 4, "tokens": [
            {"id": 1, "text": "Acme"},
            {"id": 2, "text": "hires"},
            {"id": 3, "text": "Bob"}
        ]},
        "mentions": [
            {"tag": "ORG", "tokens": [{"id": 1, "text": "Acme"}], "entity": {"id": 7}},
            {"tag": "PER", "tokens": [{"id": 3, "text": "Bob"}]}
        ],
        "relations": [
            {"id": 1, "tag": "employs", "mention_head": 0, "mention_tail": 1},
            {"tag": "employs",
             "mention_head": {"tag": "ORG", "tokens": [{"id": 1, "text": "Acme"}]},
             "mention_tail": {"tag": "PER", "tokens": [{"id": 3, "text": "Bob"}]}}
        ]
    }"#;

    #[test]
    fn test_resolve_index_and_inline_references() {
        let record: EditRecord = serde_json::from_str(EDIT).unwrap();
        let edit = record.resolve(0, EqualityPolicy::default()).unwrap();

        assert_eq!(edit.relations.len(), 2);
        assert_eq!(edit.relations[0].id, Some(1));
        assert_eq!(edit.relations[0].mention_head.tag, "ORG");
        assert_eq!(edit.relations[0].mention_tail.tag, "PER");

        // Inline heads resolve to the edit's own mention, entity link included
        assert_eq!(edit.relations[1].mention_head.entity_id(), Some(7));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut record: EditRecord = serde_json::from_str(EDIT).unwrap();
        record.relations[0].mention_tail = MentionRef::Index(9);

        let err = record.resolve(2, EqualityPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ComparisonError::UnresolvedReference {
                edit_index: 2,
                relation_index: 0,
                end: RelationEnd::Tail,
            }
        );
    }

    #[test]
    fn test_inline_mention_not_in_edit() {
        let mut record: EditRecord = serde_json::from_str(EDIT).unwrap();
        record.relations[1].mention_head =
            MentionRef::Inline(Mention::new("LOC", vec![crate::domain::Token::new(2)]));

        let err = record.resolve(0, EqualityPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::UnresolvedReference {
                relation_index: 1,
                end: RelationEnd::Head,
                ..
            }
        ));
    }

    #[test]
    fn test_f1_request_sides() {
        let body = format!(r#"{{"actual": {EDIT}, "predicted": {EDIT}}}"#);
        let request: F1Request = serde_json::from_str(&body).unwrap();
        let (actual, predicted) = request.resolve(EqualityPolicy::default()).unwrap();
        assert_eq!(actual, predicted);
    }
}
