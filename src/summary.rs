use crate::expression::{BooleanOperator, Branch, Expression, Violation, validate};
use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Shape statistics of one condition tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeSummary {
    pub rendered: String,
    pub node_count: usize,
    pub depth: usize,
    pub comparisons: usize,
    pub booleans: usize,
    pub groups: usize,
    pub numbers: usize,
    pub number_refs: usize,
    pub and_operators: usize,
    pub or_operators: usize,
    /// Deepest group nesting
    pub max_group_level: usize,
    pub unset_refs: usize,
    pub references: BTreeSet<String>,
    pub violations: Vec<Violation>,
}

pub fn summarize(expr: &Expression) -> TreeSummary {
    let mut summary = TreeSummary {
        rendered: expr.to_string(),
        depth: expr.depth(),
        violations: validate(expr),
        ..TreeSummary::default()
    };

    expr.walk(&mut |path, node| {
        summary.node_count += 1;

        let group_level = path
            .branches()
            .iter()
            .filter(|b| **b == Branch::Child)
            .count();
        summary.max_group_level = summary.max_group_level.max(group_level);

        match node {
            Expression::Number { .. } => summary.numbers += 1,
            Expression::NumberRef { reference } => {
                summary.number_refs += 1;
                match reference {
                    Some(reference) => {
                        summary.references.insert(reference.clone());
                    }
                    None => summary.unset_refs += 1,
                }
            }
            Expression::Comparison { .. } => summary.comparisons += 1,
            Expression::Boolean { operator, .. } => {
                summary.booleans += 1;
                count_operator(&mut summary, *operator);
            }
            Expression::Group { operator, .. } => {
                summary.groups += 1;
                count_operator(&mut summary, *operator);
            }
        }
    });

    summary
}

fn count_operator(summary: &mut TreeSummary, operator: BooleanOperator) {
    match operator {
        BooleanOperator::And => summary.and_operators += 1,
        BooleanOperator::Or => summary.or_operators += 1,
    }
}

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// Format a tree summary as text
pub fn format_summary_text(summary: &TreeSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "CONDITION".bold());
    let _ = writeln!(out, "{}", "-".repeat(80).bright_black());
    let _ = writeln!(out, "{}", summary.rendered);
    let _ = writeln!(out);

    let mut table = create_styled_table(&["Node kind", "Count"]);
    for (name, count) in [
        ("comparison", summary.comparisons),
        ("boolean", summary.booleans),
        ("group", summary.groups),
        ("number", summary.numbers),
        ("number-ref", summary.number_refs),
    ] {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }
    let _ = writeln!(out, "{table}");
    let _ = writeln!(out);

    let _ = writeln!(out, "Nodes:            {}", summary.node_count);
    let _ = writeln!(out, "Depth:            {}", summary.depth);
    let _ = writeln!(out, "Group nesting:    {}", summary.max_group_level);
    let _ = writeln!(
        out,
        "Operators:        {} x &&, {} x ||",
        summary.and_operators, summary.or_operators
    );
    if !summary.references.is_empty() {
        let refs: Vec<&str> = summary.references.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Series:           {}", refs.join(", "));
    }
    if summary.unset_refs > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!("Unset series:     {}", summary.unset_refs).yellow()
        );
    }
    for violation in &summary.violations {
        let _ = writeln!(out, "{}", format!("Violation: {}", violation).red());
    }

    out
}
