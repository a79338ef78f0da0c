use crate::editor::EditDefaults;
use crate::expression::{BooleanOperator, ComparisonOperator, Expression};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Polarity for the first boolean node of a tree
    pub default_operator: BooleanOperator,
    pub placeholder: PlaceholderRules,
    pub output: OutputRules,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_operator: BooleanOperator::And,
            placeholder: PlaceholderRules::default(),
            output: OutputRules::default(),
        }
    }
}

impl EditorConfig {
    pub fn edit_defaults(&self) -> EditDefaults {
        EditDefaults {
            default_operator: self.default_operator,
            placeholder: self.placeholder.to_expression(),
        }
    }
}

/// Shape of the comparison inserted for a new row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderRules {
    pub operator: ComparisonOperator,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub value: f64,
}

impl Default for PlaceholderRules {
    fn default() -> Self {
        Self {
            operator: ComparisonOperator::Gt,
            reference: None,
            value: 0.0,
        }
    }
}

impl PlaceholderRules {
    pub fn to_expression(&self) -> Expression {
        Expression::comparison(
            self.operator,
            Expression::NumberRef {
                reference: self.reference.clone(),
            },
            Expression::number(self.value),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputRules {
    pub pretty: bool,
}

impl Default for OutputRules {
    fn default() -> Self {
        Self { pretty: true }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<EditorConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    json5::from_str::<EditorConfig>(&raw).map_err(|e| ConfigError::Parse {
        path: path_display,
        message: e.to_string(),
    })
}

pub fn default_config() -> &'static EditorConfig {
    static DEFAULT_CONFIG: LazyLock<EditorConfig> = LazyLock::new(EditorConfig::default);
    &DEFAULT_CONFIG
}
