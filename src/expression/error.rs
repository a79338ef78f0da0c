use thiserror::Error;

/// Errors that can occur when decoding expression trees
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error(
        "Unrecognized expression kind '{kind}' at {path}. Valid kinds are: number, number-ref, group, &&, ||, <, <=, >, >=, =="
    )]
    UnrecognizedExpressionKind { kind: String, path: String },

    #[error("Missing field '{field}' at {path}")]
    MissingField { field: &'static str, path: String },

    #[error("Invalid field '{field}' at {path}: {reason}")]
    InvalidField {
        field: &'static str,
        path: String,
        reason: String,
    },

    #[error("Expected an expression object at {path}")]
    NotAnObject { path: String },

    #[error("Invalid expression document: {0}")]
    Syntax(String),

    #[error("Invalid node path: {0}")]
    InvalidPath(String),
}
