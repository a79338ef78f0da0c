use crate::expression::{BooleanOperator, ComparisonOperator};
use clap::ValueEnum;

/// Boolean operator as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OperatorArg {
    And, // &&
    Or,  // ||
}

impl From<OperatorArg> for BooleanOperator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::And => BooleanOperator::And,
            OperatorArg::Or => BooleanOperator::Or,
        }
    }
}

/// Comparison operator as typed on the command line (symbols need quoting
/// in most shells, so names are used instead)
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum ComparisonArg {
    Lt,  // <
    Lte, // <=
    Gt,  // >
    Gte, // >=
    Eq,  // ==
}

impl From<ComparisonArg> for ComparisonOperator {
    fn from(arg: ComparisonArg) -> Self {
        match arg {
            ComparisonArg::Lt => ComparisonOperator::Lt,
            ComparisonArg::Lte => ComparisonOperator::Lte,
            ComparisonArg::Gt => ComparisonOperator::Gt,
            ComparisonArg::Gte => ComparisonOperator::Gte,
            ComparisonArg::Eq => ComparisonOperator::Eq,
        }
    }
}
