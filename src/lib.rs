pub mod cli;
pub mod config;
pub mod diff;
pub mod document;
pub mod editor;
pub mod expression;
pub mod logging;
pub mod summary;

use crate::config::EditorConfig;
use crate::document::ConditionDocument;
use crate::expression::{flatten_nested_groups, render_tree, validate};
use anyhow::{Context, Result, anyhow, bail};
pub use cli::{ColorMode, Commands, EditArgs, OutputFormat, cli_parse};
pub use editor::{
    ConditionChange, EditContext, EditDefaults, EditError, EditIntent, EditSession,
    ExpressionEditor,
};
pub use expression::{
    BooleanOperator, Branch, ComparisonOperator, Expression, ExpressionError, NodeKind, NodePath,
    parse_expression, parse_expression_str, to_json,
};
use serde_json::Value;
use std::path::Path;
use tracing::info;

fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

fn to_json_text(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    Ok(text)
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut content = content.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file '{}'", path.display()))
        }
        None => {
            println!("{}", content.trim_end_matches('\n'));
            Ok(())
        }
    }
}

fn load_condition(
    file: &Path,
    pointer: Option<&str>,
) -> Result<(ConditionDocument, Option<Expression>)> {
    let doc = ConditionDocument::load(file, pointer)?;
    let expression = doc
        .expression()
        .with_context(|| format!("Invalid condition in '{}'", file.display()))?;
    Ok((doc, expression))
}

fn intent_for(command: &Commands) -> Option<(&EditArgs, EditIntent)> {
    match command {
        Commands::AddExpression(edit) => Some((edit, EditIntent::AddExpression)),
        Commands::AddGroup(edit) => Some((edit, EditIntent::AddGroup)),
        Commands::Delete(edit) => Some((edit, EditIntent::Delete)),
        Commands::SetOperator { edit, operator } => {
            Some((edit, EditIntent::SetBooleanOperator((*operator).into())))
        }
        Commands::SetComparison { edit, operator } => {
            Some((edit, EditIntent::SetComparisonOperator((*operator).into())))
        }
        Commands::SetValue { edit, value } => Some((edit, EditIntent::SetValue(*value))),
        Commands::SetRef { edit, reference } => {
            Some((edit, EditIntent::SetReference(reference.clone())))
        }
        Commands::Show { .. } | Commands::Info { .. } | Commands::Validate { .. } => None,
    }
}

fn run_edit(
    args: &EditArgs,
    intent: EditIntent,
    pointer: Option<&str>,
    output: Option<&Path>,
    config: &EditorConfig,
) -> Result<()> {
    let (doc, expression) = load_condition(&args.file, pointer)?;
    let root = expression.ok_or_else(|| {
        anyhow!(
            "'{}' holds no condition to edit (the condition is null)",
            args.file.display()
        )
    })?;
    let at: NodePath = args.at.parse()?;

    let session = args
        .session_operator
        .map(|op| EditSession::with_override(op.into()))
        .unwrap_or_default();
    let mut editor = ExpressionEditor::new(config.edit_defaults()).with_session(session);

    let change = editor
        .apply(&root, &at, &intent)
        .with_context(|| format!("Failed to {} at {}", intent.name(), at))?;

    if let Some(operator) = editor.session().operator_override() {
        info!(operator = %operator, "session operator");
    }
    if change.conditions.is_none() {
        info!("condition deleted");
    }

    if args.diff {
        eprint!(
            "{}",
            diff::tree_diff(Some(&root), change.conditions.as_ref())
        );
    }

    let value = if args.envelope {
        serde_json::to_value(&change).context("Failed to serialize condition change")?
    } else {
        doc.with_conditions(change.conditions.as_ref())?
    };

    emit(output, &to_json_text(&value, config.output.pretty)?)
}

pub fn run() -> Result<()> {
    let cli = cli_parse();
    logging::init_logging(cli.verbose, cli.quiet);
    apply_color_mode(cli.color);

    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(config_path) = &cli.config {
        info!(path = %config_path.display(), "loaded config");
    }

    let pointer = cli.pointer.as_deref();
    let output = cli.output.as_deref();

    if let Some((args, intent)) = intent_for(&cli.command) {
        return run_edit(args, intent, pointer, output, &config);
    }

    match &cli.command {
        Commands::Show { file } => {
            let (_, expression) = load_condition(file, pointer)?;
            let content = match (cli.format, expression) {
                (OutputFormat::Json, expression) => {
                    let value = expression.as_ref().map(to_json).unwrap_or(Value::Null);
                    to_json_text(&value, config.output.pretty)?
                }
                (OutputFormat::Text, Some(expression)) => {
                    format!("{}\n\n{}", expression, render_tree(&expression))
                }
                (OutputFormat::Text, None) => "(no condition)".to_string(),
            };
            emit(output, &content)
        }
        Commands::Info { file } => {
            let (_, expression) = load_condition(file, pointer)?;
            let expression = expression
                .ok_or_else(|| anyhow!("'{}' holds no condition", file.display()))?;
            let summary = summary::summarize(&expression);
            let content = match cli.format {
                OutputFormat::Text => summary::format_summary_text(&summary),
                OutputFormat::Json => {
                    let value =
                        serde_json::to_value(&summary).context("Failed to serialize summary")?;
                    to_json_text(&value, config.output.pretty)?
                }
            };
            emit(output, &content)
        }
        Commands::Validate { file, fix } => {
            let (doc, expression) = load_condition(file, pointer)?;
            let Some(expression) = expression else {
                return emit(output, "(no condition)");
            };

            if *fix {
                let fixed = flatten_nested_groups(&expression);
                let value = doc.with_conditions(Some(&fixed))?;
                return emit(output, &to_json_text(&value, config.output.pretty)?);
            }

            let violations = validate(&expression);
            let content = match cli.format {
                OutputFormat::Json => {
                    let value = serde_json::to_value(&violations)
                        .context("Failed to serialize violations")?;
                    to_json_text(&value, config.output.pretty)?
                }
                OutputFormat::Text if violations.is_empty() => "ok".to_string(),
                OutputFormat::Text => violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            emit(output, &content)?;

            if !violations.is_empty() {
                bail!("{} violation(s) found in '{}'", violations.len(), file.display());
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
