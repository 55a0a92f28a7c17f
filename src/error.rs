//! Error taxonomy for the code tree model.
//!
//! All structural violations surface synchronously through `ModelError` at
//! the call that caused them; nothing is swallowed or auto-corrected. The
//! one deliberate exception is non-finite metric writes, which are a logged
//! no-op in [`crate::model::MetricMap`] because they represent "no
//! measurement", not a structural fault.

use thiserror::Error;

use crate::model::EntityKind;

/// Structural errors raised by the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A line range violated `1 <= start <= end` at construction or mutation.
    #[error("invalid line range {start}..{end} (need 1 <= start <= end)")]
    Range { start: u32, end: u32 },

    /// A child's range escapes its structural parent's range at insertion.
    #[error("range of '{child}' escapes the range of its parent '{parent}'")]
    OutOfRange { child: String, parent: String },

    /// Extraction could not resolve a node's ancestor chain to a root.
    #[error("cannot resolve the ancestor chain of '{id}' to a root project")]
    DetachedNode { id: String },

    /// Merge was invoked on nodes of different kinds.
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// Decode-time validation found the same qualified id twice.
    ///
    /// Live containers cannot reach this state (inserts are idempotent by
    /// id); only a hand-written document can.
    #[error("duplicate qualified id '{id}'")]
    DuplicateId { id: String },
}

/// Errors raised by the JSON boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document is not valid JSON for the model shape.
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but violates a model invariant.
    #[error(transparent)]
    Invalid(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_ids() {
        let err = ModelError::OutOfRange {
            child: "P:/a.java:A#m()".to_string(),
            parent: "P:/a.java:A".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("P:/a.java:A#m()"));
        assert!(text.contains("P:/a.java:A"));
    }

    #[test]
    fn kind_mismatch_names_both_kinds() {
        let err = ModelError::KindMismatch {
            expected: EntityKind::Method,
            found: EntityKind::Field,
        };
        assert_eq!(err.to_string(), "kind mismatch: expected method, found field");
    }
}
