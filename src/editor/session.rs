use crate::expression::{BooleanOperator, Expression};
use tracing::debug;

/// Per-tree editing state: the boolean operator last picked with the global
/// selector. Lives as long as one user works on one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    operator_override: Option<BooleanOperator>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(operator: BooleanOperator) -> Self {
        Self {
            operator_override: Some(operator),
        }
    }

    pub fn operator_override(&self) -> Option<BooleanOperator> {
        self.operator_override
    }

    pub fn set_override(&mut self, operator: BooleanOperator) {
        self.operator_override = Some(operator);
    }

    pub fn reset(&mut self) {
        self.operator_override = None;
    }

    /// Drop the override when the tree was changed behind our back and its
    /// root operator no longer matches what was picked.
    pub fn observe_root(&mut self, root: &Expression) {
        if let (Some(chosen), Expression::Boolean { operator, .. }) = (self.operator_override, root)
            && *operator != chosen
        {
            debug!(
                chosen = %chosen,
                root = %operator,
                "root operator changed externally, resetting session override"
            );
            self.reset();
        }
    }
}
