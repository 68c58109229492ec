use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "riskrank",
    version,
    about = "Rank project risk factors by how closely they track bug history"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank alternatives for one dataset
    Rank(RankCommand),
    /// List the supported criteria, alternatives and correlation methods
    Vocab,
    /// Rank every configured project under a directory and append one CSV row each
    Batch(BatchCommand),
}

#[derive(Args)]
pub struct RankCommand {
    /// Per-version metrics file (.json or .csv)
    pub dataset: PathBuf,

    /// Directory holding riskrank.toml (defaults to the dataset's directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Project name used in reports (defaults to the configured name)
    #[arg(long)]
    pub project: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub criteria: Option<Vec<String>>,

    #[arg(long, value_delimiter = ',')]
    pub weights: Option<Vec<f64>>,

    #[arg(long, value_delimiter = ',')]
    pub alternatives: Option<Vec<String>>,

    #[arg(long)]
    pub corr_method: Option<String>,

    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct BatchCommand {
    /// Directory whose immediate subdirectories are projects
    pub dataset_dir: PathBuf,

    #[arg(long, default_value = "./data/research/topsis_output.csv")]
    pub output_file: PathBuf,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    Csv,
}
