use super::error::ExpressionError;
use std::fmt;
use std::str::FromStr;

/// Named branch of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Left,
    Right,
    /// The single child of a group
    Child,
}

impl Branch {
    pub fn name(&self) -> &'static str {
        match self {
            Branch::Left => "left",
            Branch::Right => "right",
            Branch::Child => "child",
        }
    }

    /// The other side of a binary node. `Child` has no sibling.
    pub fn sibling(&self) -> Option<Branch> {
        match self {
            Branch::Left => Some(Branch::Right),
            Branch::Right => Some(Branch::Left),
            Branch::Child => None,
        }
    }
}

impl FromStr for Branch {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Ok(Branch::Left),
            "right" | "r" => Ok(Branch::Right),
            "child" | "c" => Ok(Branch::Child),
            _ => Err(ExpressionError::InvalidPath(format!(
                "unknown branch '{}'. Valid branches are: left (l), right (r), child (c)",
                s
            ))),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address of a node: the branches taken from the root.
///
/// Written as `$`, `$.right.child.left` or `right/child/left`; the empty
/// string is the root as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<Branch>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.0
    }

    /// Number of branches taken from the root
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, branch: Branch) -> Self {
        let mut branches = self.0.clone();
        branches.push(branch);
        Self(branches)
    }
}

impl FromStr for NodePath {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);

        let branches = rest
            .split(['.', '/'])
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| segment.trim().parse())
            .collect::<Result<Vec<Branch>, _>>()?;

        Ok(NodePath(branches))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for branch in &self.0 {
            write!(f, ".{}", branch)?;
        }
        Ok(())
    }
}
