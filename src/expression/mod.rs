//! Aggregation condition trees
//!
//! An event definition's aggregation condition is a small tree of boolean,
//! group and comparison nodes over aggregation series. This module holds the
//! tree model, its JSON codec, node addressing and structural validation.
//!
//! # Wire format
//!
//! ```text
//! {"expr": "number", "value": 10}                       literal threshold
//! {"expr": "number-ref", "ref": "count-"}               aggregation series
//! {"expr": ">", "left": ..., "right": ...}              comparison (<, <=, >, >=, ==)
//! {"expr": "&&", "left": ..., "right": ...}             boolean (&&, ||)
//! {"expr": "group", "operator": "||", "child": ...}     group
//! ```
//!
//! # Node paths
//!
//! ```text
//! $                    the root
//! $.right.child        the child of the group on the right of the root
//! right/child/left     same syntax with slashes, no leading $
//! ```

pub mod error;
pub mod parser;
pub mod path;
pub mod render;
pub mod types;
pub mod validate;

pub use error::ExpressionError;
pub use parser::{parse_expression, parse_expression_str, to_json};
pub use path::{Branch, NodePath};
pub use render::render_tree;
pub use types::{BooleanOperator, ComparisonOperator, Expression, NodeKind};
pub use validate::{Violation, flatten_nested_groups, validate};
