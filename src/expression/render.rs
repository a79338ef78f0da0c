use super::path::NodePath;
use super::types::{BooleanOperator, Expression};
use colored::Colorize;
use std::fmt;
use std::fmt::Write as _;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number { value } => write!(f, "{}", value),
            Expression::NumberRef { reference } => match reference {
                Some(reference) => f.write_str(reference),
                None => f.write_str("<unset>"),
            },
            Expression::Comparison {
                operator,
                left,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            Expression::Boolean {
                operator,
                left,
                right,
            } => {
                write_operand(f, left, *operator)?;
                write!(f, " {} ", operator)?;
                write_operand(f, right, *operator)
            }
            Expression::Group { child, .. } => write!(f, "({})", child),
        }
    }
}

// `&&` binds tighter than `||`, so a mixed boolean child needs brackets
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &Expression,
    parent: BooleanOperator,
) -> fmt::Result {
    match operand {
        Expression::Boolean { operator, .. } if *operator != parent => write!(f, "({})", operand),
        _ => write!(f, "{}", operand),
    }
}

/// Render the tree one node per line, indented by depth, with the path of
/// each node so it can be passed back to `--at`.
pub fn render_tree(expr: &Expression) -> String {
    let mut out = String::new();
    expr.walk(&mut |path, node| {
        let indent = "  ".repeat(path.len());
        let _ = writeln!(out, "{}{}  {}", indent, describe(node), path_label(path));
    });
    out
}

fn path_label(path: &NodePath) -> String {
    path.to_string().bright_black().to_string()
}

fn describe(node: &Expression) -> String {
    match node {
        Expression::Number { value } => format!("{} {}", "number".cyan(), value),
        Expression::NumberRef { reference } => match reference {
            Some(reference) => format!("{} {}", "number-ref".cyan(), reference.yellow()),
            None => format!("{} {}", "number-ref".cyan(), "<unset>".red()),
        },
        Expression::Comparison { operator, .. } => {
            format!("{} {}", "comparison".green(), operator.to_string().bold())
        }
        Expression::Boolean { operator, .. } => {
            format!("{} {}", "boolean".magenta(), operator.to_string().bold())
        }
        Expression::Group { operator, .. } => {
            format!("{} {}", "group".blue(), operator.to_string().bold())
        }
    }
}
