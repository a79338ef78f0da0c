//! Pure tree edits. Every function here builds a new tree and leaves its
//! input untouched.

use super::error::EditError;
use super::session::EditSession;
use crate::expression::{BooleanOperator, Branch, Expression, NodeKind};

/// Where the edited node sits: its parent (none for the root) and how many
/// groups enclose it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditContext<'a> {
    pub parent: Option<&'a Expression>,
    pub level: usize,
}

impl<'a> EditContext<'a> {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child_of(parent: &'a Expression, level: usize) -> Self {
        Self {
            parent: Some(parent),
            level,
        }
    }
}

/// The AND/OR polarity a new sibling of `node` joins with.
///
/// Inside a boolean or group the parent's operator wins. At the root the
/// session override applies, then the root's own operator, then `default`.
pub fn effective_operator(
    node: &Expression,
    ctx: &EditContext<'_>,
    session: &EditSession,
    default: BooleanOperator,
) -> BooleanOperator {
    if let Some(operator) = ctx.parent.and_then(Expression::boolean_operator) {
        return operator;
    }

    session
        .operator_override()
        .or(match node {
            Expression::Boolean { operator, .. } => Some(*operator),
            _ => None,
        })
        .unwrap_or(default)
}

/// Join `node` with a fresh placeholder comparison
pub fn add_sibling(
    node: &Expression,
    operator: BooleanOperator,
    placeholder: &Expression,
) -> Expression {
    Expression::boolean(operator, node.clone(), placeholder.clone())
}

/// Join `node` with a new group holding a placeholder comparison. The group
/// uses the opposite polarity, so it never flattens into its surroundings.
pub fn add_group(node: &Expression, operator: BooleanOperator, placeholder: &Expression) -> Expression {
    Expression::boolean(
        operator,
        node.clone(),
        Expression::group(operator.complement(), placeholder.clone()),
    )
}

/// Remove a node. `None` travels up to the parent, which collapses around
/// the hole; at the root it means the whole condition is gone.
pub fn delete_node(_node: &Expression) -> Option<Expression> {
    None
}

/// Fold the result of an edit in `branch` back into `node`.
///
/// `update == None` means the branch was deleted.
pub fn propagate_child_edit(
    branch: Branch,
    update: Option<Expression>,
    node: &Expression,
) -> Result<Option<Expression>, EditError> {
    if node.branch(branch).is_none() {
        return Err(EditError::BranchMismatch {
            branch,
            kind: node.kind(),
        });
    }

    if update.is_none() && node.kind() == NodeKind::Comparison {
        return Err(EditError::OperandRemoved { branch });
    }

    let next = match (branch.sibling(), update) {
        // A group without its child cannot exist
        (None, None) => None,
        // A binary node missing one side degenerates to the other side
        (Some(sibling), None) => node.branch(sibling).cloned(),
        // No group directly inside a group: the inner one replaces the outer
        (None, Some(update)) if update.kind() == NodeKind::Group => Some(update),
        (_, Some(update)) => Some(replace_branch(node, branch, update)),
    };

    Ok(next)
}

fn replace_branch(node: &Expression, branch: Branch, update: Expression) -> Expression {
    let mut next = node.clone();
    match (&mut next, branch) {
        (Expression::Boolean { left, .. }, Branch::Left)
        | (Expression::Comparison { left, .. }, Branch::Left) => **left = update,
        (Expression::Boolean { right, .. }, Branch::Right)
        | (Expression::Comparison { right, .. }, Branch::Right) => **right = update,
        (Expression::Group { child, .. }, Branch::Child) => **child = update,
        _ => {}
    }
    next
}

/// Rewrite every boolean operator under `node` for the polarity `operator`.
///
/// Boolean nodes take `operator`; groups take its complement and their
/// interior is rewritten with the group's operator in turn.
pub fn rewrite_operators(node: &Expression, operator: BooleanOperator) -> Expression {
    match node {
        Expression::Boolean { left, right, .. } => Expression::boolean(
            operator,
            rewrite_operators(left, operator),
            rewrite_operators(right, operator),
        ),
        Expression::Group { child, .. } => {
            let inner = operator.complement();
            Expression::group(inner, rewrite_operators(child, inner))
        }
        other => other.clone(),
    }
}

/// Change a group's own operator and rewrite its interior to match
pub fn set_group_operator(group: &Expression, operator: BooleanOperator) -> Option<Expression> {
    match group {
        Expression::Group { child, .. } => Some(Expression::group(
            operator,
            rewrite_operators(child, operator),
        )),
        _ => None,
    }
}
