use crate::expression::{Branch, NodeKind};
use thiserror::Error;

/// Errors that can occur when applying an edit to a condition tree
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Cannot {intent} on a {kind} node at {path}")]
    UnsupportedEdit {
        intent: &'static str,
        kind: NodeKind,
        path: String,
    },

    #[error("Node at {path} is a {kind} and has no '{branch}' branch")]
    NoSuchBranch {
        branch: Branch,
        kind: NodeKind,
        path: String,
    },

    #[error("Threshold at {path} must be a finite number, got {value}")]
    NonFiniteValue { value: f64, path: String },

    #[error("A comparison cannot lose its '{branch}' operand")]
    OperandRemoved { branch: Branch },

    #[error("A {kind} node has no '{branch}' branch")]
    BranchMismatch { branch: Branch, kind: NodeKind },
}
