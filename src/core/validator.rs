//! Preconditions shared by all engines.
//!
//! Comparing edits only makes sense when they annotate the same document,
//! which is checked through their token sequences.

use tracing::debug;

use crate::domain::{mutually_covering, DocumentEdit, EqualityPolicy, Token};
use crate::error::{ComparisonError, Result};

/// Minimum number of edits any comparison needs
pub const MIN_EDITS: usize = 2;

/// Whether all token lists contain the same tokens (order irrelevant)
pub fn same_tokens(token_lists: &[&[Token]], policy: EqualityPolicy) -> bool {
    first_token_mismatch(token_lists, policy).is_none()
}

/// Index of the first list whose tokens do not cover, and are not covered
/// by, the first list
fn first_token_mismatch(token_lists: &[&[Token]], policy: EqualityPolicy) -> Option<usize> {
    let (base, rest) = token_lists.split_first()?;
    rest.iter()
        .position(|tokens| !mutually_covering(base, tokens, policy))
        .map(|offset| offset + 1)
}

/// Fail unless at least `required` edits are supplied
pub fn require_edit_count(edits: &[DocumentEdit], required: usize) -> Result<()> {
    if edits.len() < required {
        return Err(ComparisonError::InsufficientEditCount {
            required,
            actual: edits.len(),
        });
    }
    Ok(())
}

/// Fail unless every edit has the same tokens as the first one
pub fn require_same_tokens(edits: &[DocumentEdit], policy: EqualityPolicy) -> Result<()> {
    let token_lists: Vec<&[Token]> = edits.iter().map(DocumentEdit::tokens).collect();

    match first_token_mismatch(&token_lists, policy) {
        Some(edit_index) => {
            debug!(edit_index, "token sets differ");
            Err(ComparisonError::TokenSetMismatch { edit_index })
        }
        None => Ok(()),
    }
}

/// Check the preconditions of a multi-edit comparison
pub fn validate_edits(edits: &[DocumentEdit], policy: EqualityPolicy) -> Result<()> {
    require_edit_count(edits, MIN_EDITS)?;
    require_same_tokens(edits, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(1).with_text("The").with_position(0, 0).with_pos_tag("DT"),
            Token::new(2).with_text("company").with_position(1, 0).with_pos_tag("NN"),
            Token::new(3).with_text("grows").with_position(2, 0).with_pos_tag("VBZ"),
        ]
    }

    #[test]
    fn test_permutation_is_same_tokens() {
        let a = tokens();
        let mut b = tokens();
        b.reverse();
        assert!(same_tokens(&[&a[..], &b[..]], EqualityPolicy::default()));
    }

    #[test]
    fn test_missing_or_extra_token() {
        let a = tokens();
        let b = tokens()[..2].to_vec();
        let policy = EqualityPolicy::default();
        assert!(!same_tokens(&[&a[..], &b[..]], policy));
        assert!(!same_tokens(&[&b[..], &a[..]], policy));
    }

    #[test]
    fn test_trivial_lists() {
        let a = tokens();
        assert!(same_tokens(&[], EqualityPolicy::default()));
        assert!(same_tokens(&[&a[..]], EqualityPolicy::default()));
    }

    #[test]
    fn test_single_edit_rejected() {
        let edits = vec![DocumentEdit::new(Document::new(tokens()))];
        let result = validate_edits(&edits, EqualityPolicy::default());
        assert_eq!(
            result,
            Err(ComparisonError::InsufficientEditCount {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_mismatch_reports_edit_index() {
        let mut changed = tokens();
        changed[1].pos_tag = Some("NNP".to_string());

        let edits = vec![
            DocumentEdit::new(Document::new(tokens())),
            DocumentEdit::new(Document::new(tokens())),
            DocumentEdit::new(Document::new(changed)),
        ];
        let result = validate_edits(&edits, EqualityPolicy::default());
        assert_eq!(result, Err(ComparisonError::TokenSetMismatch { edit_index: 2 }));
    }
}
