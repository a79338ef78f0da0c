use super::types::{Expression, NodeKind};
use serde::Serialize;
use std::fmt;

/// A structural rule a condition tree breaks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Violation {
    /// A group whose child is another group
    NestedGroup { path: String },
    /// A comparison side that is not a number or number-ref
    NonOperandInComparison { path: String, kind: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NestedGroup { path } => {
                write!(f, "{}: group directly contains another group", path)
            }
            Violation::NonOperandInComparison { path, kind } => write!(
                f,
                "{}: comparison operand must be a number or number-ref, found {}",
                path, kind
            ),
        }
    }
}

/// Collect every rule violation in the tree, in depth-first order
pub fn validate(expr: &Expression) -> Vec<Violation> {
    let mut violations = Vec::new();

    expr.walk(&mut |path, node| match node {
        Expression::Group { child, .. } if child.kind() == NodeKind::Group => {
            violations.push(Violation::NestedGroup {
                path: path.to_string(),
            });
        }
        Expression::Comparison { .. } => {
            for branch in node.branches() {
                if let Some(operand) = node.branch(*branch)
                    && !operand.kind().is_operand()
                {
                    violations.push(Violation::NonOperandInComparison {
                        path: path.join(*branch).to_string(),
                        kind: operand.kind().to_string(),
                    });
                }
            }
        }
        _ => {}
    });

    violations
}

/// Collapse every `group(group(x))` into the inner group.
///
/// The inner group's operator wins, the same outcome an edit produces when a
/// group's child turns into a group.
pub fn flatten_nested_groups(expr: &Expression) -> Expression {
    match expr {
        Expression::Group { operator, child } => {
            let child = flatten_nested_groups(child);
            if child.kind() == NodeKind::Group {
                child
            } else {
                Expression::group(*operator, child)
            }
        }
        Expression::Boolean {
            operator,
            left,
            right,
        } => Expression::boolean(
            *operator,
            flatten_nested_groups(left),
            flatten_nested_groups(right),
        ),
        Expression::Comparison {
            operator,
            left,
            right,
        } => Expression::comparison(
            *operator,
            flatten_nested_groups(left),
            flatten_nested_groups(right),
        ),
        leaf => leaf.clone(),
    }
}
