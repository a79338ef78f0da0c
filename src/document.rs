use crate::expression::{Expression, ExpressionError, parse_expression, to_json};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse '{path}': {message}")]
    Syntax { path: String, message: String },
    #[error("Nothing found at JSON pointer '{0}'")]
    PointerNotFound(String),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

/// A JSON document with a condition tree somewhere inside it. Without a
/// pointer the whole document is the condition.
#[derive(Debug, Clone)]
pub struct ConditionDocument {
    root: Value,
    pointer: Option<String>,
}

impl ConditionDocument {
    pub fn new(root: Value, pointer: Option<&str>) -> Self {
        Self {
            root,
            pointer: pointer.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Read a JSON or JSON5 file
    pub fn load(path: &Path, pointer: Option<&str>) -> Result<Self, DocumentError> {
        let path_display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path_display.clone(),
            source,
        })?;
        let root = json5::from_str::<Value>(&raw).map_err(|e| DocumentError::Syntax {
            path: path_display,
            message: e.to_string(),
        })?;
        Ok(Self::new(root, pointer))
    }

    fn raw_condition(&self) -> Result<&Value, DocumentError> {
        match &self.pointer {
            Some(pointer) => self
                .root
                .pointer(pointer)
                .ok_or_else(|| DocumentError::PointerNotFound(pointer.clone())),
            None => Ok(&self.root),
        }
    }

    /// The condition tree, or `None` when the document holds `null` there
    pub fn expression(&self) -> Result<Option<Expression>, DocumentError> {
        let raw = self.raw_condition()?;
        if raw.is_null() {
            return Ok(None);
        }
        Ok(Some(parse_expression(raw)?))
    }

    /// A copy of the document with the condition replaced; `None` writes `null`
    pub fn with_conditions(&self, conditions: Option<&Expression>) -> Result<Value, DocumentError> {
        let replacement = conditions.map(to_json).unwrap_or(Value::Null);
        match &self.pointer {
            Some(pointer) => {
                let mut root = self.root.clone();
                let slot = root
                    .pointer_mut(pointer)
                    .ok_or_else(|| DocumentError::PointerNotFound(pointer.clone()))?;
                *slot = replacement;
                Ok(root)
            }
            None => Ok(replacement),
        }
    }
}
