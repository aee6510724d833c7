use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use seevals::compositions::ElementType;

#[derive(Parser, Debug)]
#[command(
    name = "seevals",
    version,
    about = "Build and summarize human-evaluation datasets for structured model output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check selectors against a JSON schema.
    Check(CheckArgs),
    /// Build an evaluation dataset from generated documents.
    Build(BuildArgs),
    /// Report confidence bounds for a sample size.
    Bounds(BoundsArgs),
    /// Find the smallest sample size meeting an error margin.
    Plan(PlanArgs),
    /// Count, print or dump weak compositions.
    Compositions(CompositionsArgs),
    /// Aggregate reviewer scores from a scored dataset.
    Summarize(SummarizeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long)]
    pub schema: PathBuf,

    #[arg(long = "selector", required = true)]
    pub selectors: Vec<String>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[arg(long)]
    pub schema: PathBuf,

    #[arg(long)]
    pub plan: PathBuf,

    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Overrides the seed in the plan file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Key wrapping each document on an input line.
    #[arg(long)]
    pub envelope: Option<String>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BoundsArgs {
    #[arg(long)]
    pub samples: usize,

    #[arg(long)]
    pub population: Option<usize>,

    #[arg(long, default_value_t = 0.0)]
    pub lower: f64,

    #[arg(long, default_value_t = 1.0)]
    pub upper: f64,

    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long)]
    pub margin: f64,

    #[arg(long)]
    pub population: Option<usize>,

    #[arg(long, default_value_t = 0.0)]
    pub lower: f64,

    #[arg(long, default_value_t = 1.0)]
    pub upper: f64,

    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CellWidth {
    U8,
    U16,
    U32,
    U64,
}

impl CellWidth {
    pub fn element_type(self) -> ElementType {
        match self {
            Self::U8 => ElementType::U8,
            Self::U16 => ElementType::U16,
            Self::U32 => ElementType::U32,
            Self::U64 => ElementType::U64,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CompositionsArgs {
    #[arg(long)]
    pub total: i64,

    #[arg(long)]
    pub parts: i64,

    /// Dump rows to this file instead of printing them.
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CellWidth::U16)]
    pub element_type: CellWidth,

    /// Print only the row count.
    #[arg(long, default_value_t = false)]
    pub count_only: bool,

    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    #[arg(long)]
    pub output: Option<PathBuf>,
}
