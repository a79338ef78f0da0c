use super::path::{Branch, NodePath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean operator joining two conditions or applied inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BooleanOperator {
    #[default]
    #[serde(rename = "&&", alias = "and", alias = "AND")]
    And,
    #[serde(rename = "||", alias = "or", alias = "OR")]
    Or,
}

impl BooleanOperator {
    /// Parse the wire symbol (`&&` / `||`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "&&" => Some(BooleanOperator::And),
            "||" => Some(BooleanOperator::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BooleanOperator::And => "&&",
            BooleanOperator::Or => "||",
        }
    }

    /// The opposite polarity, used for the operator inside a new group
    pub fn complement(self) -> Self {
        match self {
            BooleanOperator::And => BooleanOperator::Or,
            BooleanOperator::Or => BooleanOperator::And,
        }
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Comparison operators supported between two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[default]
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "==")]
    Eq,
}

impl ComparisonOperator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "<" => Some(ComparisonOperator::Lt),
            "<=" => Some(ComparisonOperator::Lte),
            ">" => Some(ComparisonOperator::Gt),
            ">=" => Some(ComparisonOperator::Gte),
            "==" => Some(ComparisonOperator::Eq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Eq => "==",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The five node kinds an expression tree is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Number,
    NumberRef,
    Comparison,
    Boolean,
    Group,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Number => "number",
            NodeKind::NumberRef => "number-ref",
            NodeKind::Comparison => "comparison",
            NodeKind::Boolean => "boolean",
            NodeKind::Group => "group",
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, NodeKind::Number | NodeKind::NumberRef)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of an aggregation condition tree.
///
/// Trees are values: editing never mutates a node in place, it builds a new
/// tree from the old one.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal threshold, e.g. `{"expr": "number", "value": 10}`
    Number { value: f64 },
    /// Reference to an aggregation series, e.g. `count()`. `None` until chosen.
    NumberRef { reference: Option<String> },
    Comparison {
        operator: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Boolean {
        operator: BooleanOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Group {
        operator: BooleanOperator,
        child: Box<Expression>,
    },
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Expression::Number { value }
    }

    pub fn number_ref(reference: impl Into<String>) -> Self {
        Expression::NumberRef {
            reference: Some(reference.into()),
        }
    }

    pub fn unset_ref() -> Self {
        Expression::NumberRef { reference: None }
    }

    pub fn comparison(operator: ComparisonOperator, left: Expression, right: Expression) -> Self {
        Expression::Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn boolean(operator: BooleanOperator, left: Expression, right: Expression) -> Self {
        Expression::Boolean {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn group(operator: BooleanOperator, child: Expression) -> Self {
        Expression::Group {
            operator,
            child: Box::new(child),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Number { .. } => NodeKind::Number,
            Expression::NumberRef { .. } => NodeKind::NumberRef,
            Expression::Comparison { .. } => NodeKind::Comparison,
            Expression::Boolean { .. } => NodeKind::Boolean,
            Expression::Group { .. } => NodeKind::Group,
        }
    }

    /// Operator that boolean siblings of this node's children use: the
    /// `expr` of a boolean node, the `operator` of a group.
    pub fn boolean_operator(&self) -> Option<BooleanOperator> {
        match self {
            Expression::Boolean { operator, .. } | Expression::Group { operator, .. } => {
                Some(*operator)
            }
            _ => None,
        }
    }

    /// Branches this node kind carries, in display order
    pub fn branches(&self) -> &'static [Branch] {
        match self {
            Expression::Comparison { .. } | Expression::Boolean { .. } => {
                &[Branch::Left, Branch::Right]
            }
            Expression::Group { .. } => &[Branch::Child],
            Expression::Number { .. } | Expression::NumberRef { .. } => &[],
        }
    }

    pub fn branch(&self, branch: Branch) -> Option<&Expression> {
        match (self, branch) {
            (Expression::Comparison { left, .. }, Branch::Left)
            | (Expression::Boolean { left, .. }, Branch::Left) => Some(left),
            (Expression::Comparison { right, .. }, Branch::Right)
            | (Expression::Boolean { right, .. }, Branch::Right) => Some(right),
            (Expression::Group { child, .. }, Branch::Child) => Some(child),
            _ => None,
        }
    }

    /// Look up the node at `path`, if every branch on the way exists
    pub fn get(&self, path: &NodePath) -> Option<&Expression> {
        path.branches()
            .iter()
            .try_fold(self, |node, branch| node.branch(*branch))
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        1 + self
            .branches()
            .iter()
            .filter_map(|b| self.branch(*b))
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Visit every node depth-first, parents before children
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&NodePath, &Expression),
    {
        self.walk_from(&NodePath::root(), visit);
    }

    fn walk_from<F>(&self, path: &NodePath, visit: &mut F)
    where
        F: FnMut(&NodePath, &Expression),
    {
        visit(path, self);
        for branch in self.branches() {
            if let Some(child) = self.branch(*branch) {
                child.walk_from(&path.join(*branch), visit);
            }
        }
    }
}
