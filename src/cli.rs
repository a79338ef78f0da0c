mod operator;

use clap::{Args, Parser, Subcommand, ValueEnum};
pub use operator::{ComparisonArg, OperatorArg};
use std::path::PathBuf;

/// Inspect and edit aggregation conditions of event definitions
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Editor config file (JSON5)
    #[arg(long, global = true, env = "CONDITION_EDITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON pointer to the condition inside the document (e.g. "/config/conditions/expression")
    #[arg(long, global = true)]
    pub pointer: Option<String>,

    /// Write results to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Output format for show, info and validate
    #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Options shared by every edit subcommand
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Document holding the condition (JSON or JSON5)
    pub file: PathBuf,

    /// Path of the node to edit (e.g. "$", "$.right.child")
    #[arg(long, default_value = "$")]
    pub at: String,

    /// Boolean operator picked earlier in this editing session
    #[arg(long, value_enum)]
    pub session_operator: Option<OperatorArg>,

    /// Print the host update ({"conditions": ...}) instead of the document
    #[arg(long)]
    pub envelope: bool,

    /// Show a diff of the condition before and after the edit on stderr
    #[arg(long)]
    pub diff: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the condition as text and as an annotated tree
    Show {
        /// Document holding the condition
        file: PathBuf,
    },
    /// Summarize node kinds, depth and operators of the condition
    Info {
        /// Document holding the condition
        file: PathBuf,
    },
    /// Check the condition for structural problems
    Validate {
        /// Document holding the condition
        file: PathBuf,

        /// Output the condition with nested groups collapsed
        #[arg(long)]
        fix: bool,
    },
    /// Join a node with a new comparison
    AddExpression(EditArgs),
    /// Join a node with a new group of opposite polarity
    AddGroup(EditArgs),
    /// Remove a node; deleting the root removes the whole condition
    Delete(EditArgs),
    /// Change the global operator (at the root) or a group's operator
    SetOperator {
        #[command(flatten)]
        edit: EditArgs,

        #[arg(long, value_enum)]
        operator: OperatorArg,
    },
    /// Change the operator of a comparison
    SetComparison {
        #[command(flatten)]
        edit: EditArgs,

        #[arg(long, value_enum)]
        operator: ComparisonArg,
    },
    /// Change the threshold of a number node
    SetValue {
        #[command(flatten)]
        edit: EditArgs,

        #[arg(long, allow_negative_numbers = true, value_parser = parse_threshold)]
        value: f64,
    },
    /// Point a number-ref node at another aggregation series
    SetRef {
        #[command(flatten)]
        edit: EditArgs,

        #[arg(long = "ref")]
        reference: String,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}

// Stored conditions cannot carry `inf` or `NaN`
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}
