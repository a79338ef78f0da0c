//! Applying user edits to condition trees
//!
//! The editor takes the whole tree, the path of the node the user acted on and
//! the intent, and returns the replacement tree in the shape the host form
//! expects: `{"conditions": <tree>}`, or `{"conditions": null}` when the last
//! condition was deleted.
//!
//! # Edits per node kind
//!
//! ```text
//! comparison, boolean, group   add-expression, add-group, delete
//! comparison                   set-comparison
//! number                       set-value
//! number-ref                   set-ref
//! group                        set-operator (the group's own polarity)
//! root (not a group)           set-operator (global polarity, remembered in the session)
//! ```

pub mod error;
pub mod ops;
pub mod session;

pub use error::EditError;
pub use ops::{
    EditContext, add_group, add_sibling, delete_node, effective_operator, propagate_child_edit,
    rewrite_operators, set_group_operator,
};
pub use session::EditSession;

use crate::expression::{
    BooleanOperator, Branch, ComparisonOperator, Expression, NodeKind, NodePath,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One user action on one node
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    /// Join the node with a new comparison
    AddExpression,
    /// Join the node with a new group of opposite polarity
    AddGroup,
    Delete,
    SetBooleanOperator(BooleanOperator),
    SetComparisonOperator(ComparisonOperator),
    SetValue(f64),
    SetReference(String),
}

impl EditIntent {
    pub fn name(&self) -> &'static str {
        match self {
            EditIntent::AddExpression => "add an expression",
            EditIntent::AddGroup => "add a group",
            EditIntent::Delete => "delete",
            EditIntent::SetBooleanOperator(_) => "set the boolean operator",
            EditIntent::SetComparisonOperator(_) => "set the comparison operator",
            EditIntent::SetValue(_) => "set a value",
            EditIntent::SetReference(_) => "set a reference",
        }
    }
}

/// Partial update handed to the host after each edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionChange {
    pub conditions: Option<Expression>,
}

/// Values the editor fills in for nodes it creates
#[derive(Debug, Clone, PartialEq)]
pub struct EditDefaults {
    /// Polarity used at the root when nothing else decides it
    pub default_operator: BooleanOperator,
    /// Comparison inserted by add-expression and add-group
    pub placeholder: Expression,
}

impl Default for EditDefaults {
    fn default() -> Self {
        Self {
            default_operator: BooleanOperator::And,
            placeholder: empty_comparison(),
        }
    }
}

/// `<unset> > 0`, the comparison a new row starts with
pub fn empty_comparison() -> Expression {
    Expression::comparison(
        ComparisonOperator::Gt,
        Expression::unset_ref(),
        Expression::number(0.0),
    )
}

/// Stateful front of the pure edit operations: owns the session override
/// and the defaults for new nodes.
#[derive(Debug, Clone, Default)]
pub struct ExpressionEditor {
    defaults: EditDefaults,
    session: EditSession,
}

impl ExpressionEditor {
    pub fn new(defaults: EditDefaults) -> Self {
        Self {
            defaults,
            session: EditSession::new(),
        }
    }

    pub fn with_session(mut self, session: EditSession) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn add_sibling(&self, node: &Expression, ctx: &EditContext<'_>) -> Expression {
        let operator = self.effective_operator(node, ctx);
        add_sibling(node, operator, &self.defaults.placeholder)
    }

    pub fn add_group(&self, node: &Expression, ctx: &EditContext<'_>) -> Expression {
        let operator = self.effective_operator(node, ctx);
        add_group(node, operator, &self.defaults.placeholder)
    }

    /// Remember `operator` for this session and rewrite the tree under `node`
    pub fn change_operator(&mut self, node: &Expression, operator: BooleanOperator) -> Expression {
        self.session.set_override(operator);
        rewrite_operators(node, operator)
    }

    pub fn effective_operator(&self, node: &Expression, ctx: &EditContext<'_>) -> BooleanOperator {
        effective_operator(node, ctx, &self.session, self.defaults.default_operator)
    }

    /// Apply `intent` to the node at `at` and return the new tree
    pub fn apply(
        &mut self,
        root: &Expression,
        at: &NodePath,
        intent: &EditIntent,
    ) -> Result<ConditionChange, EditError> {
        self.session.observe_root(root);

        let conditions = self.edit_at(
            root,
            EditContext::root(),
            at.branches(),
            &NodePath::root(),
            intent,
        )?;

        debug!(
            path = %at,
            intent = intent.name(),
            deleted = conditions.is_none(),
            "applied edit"
        );
        Ok(ConditionChange { conditions })
    }

    fn edit_at(
        &mut self,
        node: &Expression,
        ctx: EditContext<'_>,
        remaining: &[Branch],
        path: &NodePath,
        intent: &EditIntent,
    ) -> Result<Option<Expression>, EditError> {
        let Some((branch, rest)) = remaining.split_first() else {
            return self.edit_node(node, &ctx, path, intent);
        };

        let child = node.branch(*branch).ok_or_else(|| EditError::NoSuchBranch {
            branch: *branch,
            kind: node.kind(),
            path: path.to_string(),
        })?;

        let level = match node.kind() {
            NodeKind::Group => ctx.level + 1,
            _ => ctx.level,
        };
        let update = self.edit_at(
            child,
            EditContext::child_of(node, level),
            rest,
            &path.join(*branch),
            intent,
        )?;

        propagate_child_edit(*branch, update, node)
    }

    fn edit_node(
        &mut self,
        node: &Expression,
        ctx: &EditContext<'_>,
        path: &NodePath,
        intent: &EditIntent,
    ) -> Result<Option<Expression>, EditError> {
        debug!(kind = %node.kind(), path = %path, level = ctx.level, intent = intent.name(), "editing node");

        let unsupported = || EditError::UnsupportedEdit {
            intent: intent.name(),
            kind: node.kind(),
            path: path.to_string(),
        };

        match intent {
            EditIntent::AddExpression | EditIntent::AddGroup | EditIntent::Delete
                if node.kind().is_operand() =>
            {
                Err(unsupported())
            }
            EditIntent::AddExpression => Ok(Some(self.add_sibling(node, ctx))),
            EditIntent::AddGroup => Ok(Some(self.add_group(node, ctx))),
            EditIntent::Delete => Ok(delete_node(node)),
            EditIntent::SetBooleanOperator(operator) => match node {
                Expression::Group { .. } => Ok(set_group_operator(node, *operator)),
                _ if ctx.parent.is_none() => Ok(Some(self.change_operator(node, *operator))),
                _ => Err(unsupported()),
            },
            EditIntent::SetComparisonOperator(operator) => match node {
                Expression::Comparison { left, right, .. } => Ok(Some(Expression::comparison(
                    *operator,
                    (**left).clone(),
                    (**right).clone(),
                ))),
                _ => Err(unsupported()),
            },
            EditIntent::SetValue(value) => match node {
                Expression::Number { .. } if !value.is_finite() => Err(EditError::NonFiniteValue {
                    value: *value,
                    path: path.to_string(),
                }),
                Expression::Number { .. } => Ok(Some(Expression::number(*value))),
                _ => Err(unsupported()),
            },
            EditIntent::SetReference(reference) => match node {
                Expression::NumberRef { .. } => Ok(Some(Expression::number_ref(reference.as_str()))),
                _ => Err(unsupported()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cmp(reference: &str) -> Expression {
        Expression::comparison(
            ComparisonOperator::Gt,
            Expression::number_ref(reference),
            Expression::number(1.0),
        )
    }

    fn path(s: &str) -> NodePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_at_root_comparison() {
        let mut editor = ExpressionEditor::default();
        let change = editor
            .apply(&cmp("a"), &NodePath::root(), &EditIntent::AddExpression)
            .unwrap();

        assert_eq!(
            change.conditions,
            Some(Expression::boolean(
                BooleanOperator::And,
                cmp("a"),
                empty_comparison()
            ))
        );
    }

    #[test]
    fn test_apply_descends_and_rebuilds() {
        let root = Expression::boolean(BooleanOperator::Or, cmp("a"), cmp("b"));
        let mut editor = ExpressionEditor::default();
        let change = editor
            .apply(&root, &path("right.right"), &EditIntent::SetValue(42.0))
            .unwrap();

        let expected = Expression::boolean(
            BooleanOperator::Or,
            cmp("a"),
            Expression::comparison(
                ComparisonOperator::Gt,
                Expression::number_ref("b"),
                Expression::number(42.0),
            ),
        );
        assert_eq!(change.conditions, Some(expected));
    }

    #[test]
    fn test_delete_operand_is_unsupported() {
        let mut editor = ExpressionEditor::default();
        let err = editor
            .apply(&cmp("a"), &path("left"), &EditIntent::Delete)
            .unwrap_err();
        assert_eq!(
            err,
            EditError::UnsupportedEdit {
                intent: "delete",
                kind: NodeKind::NumberRef,
                path: "$.left".to_string()
            }
        );
    }

    #[test]
    fn test_missing_branch_reports_path() {
        let mut editor = ExpressionEditor::default();
        let err = editor
            .apply(&cmp("a"), &path("child"), &EditIntent::Delete)
            .unwrap_err();
        assert_eq!(
            err,
            EditError::NoSuchBranch {
                branch: Branch::Child,
                kind: NodeKind::Comparison,
                path: "$".to_string()
            }
        );
    }

    #[test]
    fn test_set_operator_below_root_needs_a_group() {
        let root = Expression::boolean(BooleanOperator::And, cmp("a"), cmp("b"));
        let mut editor = ExpressionEditor::default();
        let err = editor
            .apply(
                &root,
                &path("left"),
                &EditIntent::SetBooleanOperator(BooleanOperator::Or),
            )
            .unwrap_err();
        assert!(matches!(err, EditError::UnsupportedEdit { .. }));
        assert_eq!(editor.session().operator_override(), None);
    }
}
