use crate::expression::{Expression, to_json};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// Computes a colored line diff between two strings
pub fn compute_text_diff(text1: &str, text2: &str) -> String {
    let diff = TextDiff::from_lines(text1, text2);
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        let line = line.trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Delete => result.push_str(&format!("{}\n", format!("- {}", line).red())),
            ChangeTag::Insert => result.push_str(&format!("{}\n", format!("+ {}", line).green())),
            ChangeTag::Equal => result.push_str(&format!("  {}\n", line)),
        }
    }

    result
}

/// Diff the pretty JSON of a tree before and after an edit. A deleted
/// condition shows up as `null`.
pub fn tree_diff(old: Option<&Expression>, new: Option<&Expression>) -> String {
    compute_text_diff(&pretty(old), &pretty(new))
}

fn pretty(expr: Option<&Expression>) -> String {
    let value = expr.map(to_json).unwrap_or(serde_json::Value::Null);
    let mut text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "null".to_string());
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{BooleanOperator, ComparisonOperator};

    fn cmp() -> Expression {
        Expression::comparison(
            ComparisonOperator::Gt,
            Expression::number_ref("count-"),
            Expression::number(1.0),
        )
    }

    #[test]
    fn test_identical_trees_have_no_changes() {
        colored::control::set_override(false);
        let diff = tree_diff(Some(&cmp()), Some(&cmp()));
        assert!(diff.lines().all(|l| l.starts_with("  ")));
    }

    #[test]
    fn test_wrapping_shows_insertions() {
        colored::control::set_override(false);
        let wrapped = Expression::boolean(BooleanOperator::And, cmp(), cmp());
        let diff = tree_diff(Some(&cmp()), Some(&wrapped));
        assert!(diff.lines().any(|l| l.starts_with("+ ") && l.contains("\"&&\"")));
    }

    #[test]
    fn test_deletion_diffs_against_null() {
        colored::control::set_override(false);
        let diff = tree_diff(Some(&cmp()), None);
        assert!(diff.lines().any(|l| l == "+ null"));
        assert!(diff.lines().any(|l| l.starts_with("- ")));
    }
}
