mod cli;
mod config;
mod dataset;
mod engine;
mod error;
mod report;
mod types;

use crate::dataset::MetricsDataset;
use crate::engine::analyze::{analyze, AnalysisRequest};
use crate::engine::correlation::CorrelationMethod;
use crate::engine::registry::{AlternativeKind, CriterionKind};
use crate::engine::topsis::Impact;
use crate::error::RankError;
use crate::types::config::{check_weights, RankConfig};
use crate::types::report::RankReport;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const CONFIGURATION: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

const NUM_LINES_COLUMN: &str = "lizard_total_nloc";

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: cli::Cli) -> Result<i32, RankError> {
    match cli.command {
        cli::Commands::Rank(cmd) => {
            let config_dir = match &cmd.config {
                Some(dir) if !dir.exists() => {
                    return Err(RankError::PathNotFound(dir.display().to_string()));
                }
                Some(dir) => dir.clone(),
                None => dataset_parent(&cmd.dataset),
            };

            let loaded = config::load_config(&config_dir)?;
            if loaded.is_none() {
                info!(dir = %config_dir.display(), "no riskrank.toml found; using defaults");
            }

            let mut request = match &loaded {
                Some(cfg) => cfg.request()?,
                None => AnalysisRequest::default(),
            };
            if let Some(criteria) = cmd.criteria {
                request.criteria = criteria;
            }
            if let Some(weights) = cmd.weights {
                check_weights(&weights)?;
                request.weights = weights;
            }
            if let Some(alternatives) = cmd.alternatives {
                request.alternatives = alternatives;
            }
            if let Some(method) = cmd.corr_method.as_deref() {
                request.method = CorrelationMethod::from_name(method)?;
            }

            let project = cmd
                .project
                .or_else(|| loaded.as_ref().map(|cfg| cfg.project.name.clone()))
                .or_else(|| {
                    let dir = config_dir.canonicalize().ok()?;
                    dir.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| "project".to_string());

            let dataset = filter_versions(dataset::load_dataset(&cmd.dataset)?, loaded.as_ref());
            let rank_report = analyze(&project, &dataset, &request)?;

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Csv => report::OutputFormat::Csv,
            };
            let rendered = report::render(&rank_report, output_format)?;
            println!("{rendered}");

            if rank_report.is_degenerate() {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Vocab => {
            println!("criteria:");
            for kind in CriterionKind::ALL {
                println!(
                    "- {} (column {}, {})",
                    kind.name(),
                    kind.column(),
                    kind.direction().name()
                );
            }
            println!("alternatives:");
            for kind in AlternativeKind::ALL {
                println!("- {} (column {})", kind.name(), kind.column());
            }
            println!("impacts:");
            for impact in Impact::ALL {
                println!("- {}", impact.name());
            }
            println!("correlation methods:");
            for method in CorrelationMethod::ALL {
                if method == CorrelationMethod::default() {
                    println!("- {method} (default)");
                } else {
                    println!("- {method}");
                }
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Batch(cmd) => {
            if !cmd.dataset_dir.is_dir() {
                return Err(RankError::PathNotFound(
                    cmd.dataset_dir.display().to_string(),
                ));
            }

            let projects = WalkDir::new(&cmd.dataset_dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_dir())
                .map(|entry| entry.into_path())
                .filter(|dir| dir.join(config::DEFAULT_CONFIG_FILE).exists())
                .collect::<Vec<_>>();

            if projects.is_empty() {
                warn!(dir = %cmd.dataset_dir.display(), "no project directories with riskrank.toml");
                return Ok(exit_code::WARNINGS);
            }

            let mut written = 0;
            let mut warnings = false;
            for dir in &projects {
                match rank_project(dir) {
                    Ok((name, num_lines, rank_report)) => {
                        match report::csv::append_batch_row(
                            &cmd.output_file,
                            &name,
                            num_lines,
                            &rank_report,
                        ) {
                            Ok(()) => {
                                warnings |= rank_report.is_degenerate();
                                written += 1;
                            }
                            Err(e @ RankError::BatchColumnMismatch { .. }) => {
                                warn!(project = %name, error = %e, "skipping project");
                                warnings = true;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Err(e) => {
                        warn!(project = %dir.display(), error = %e, "skipping project");
                        warnings = true;
                    }
                }
            }

            println!(
                "batch: {written} of {} project(s) written to {}",
                projects.len(),
                cmd.output_file.display()
            );
            if warnings {
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
    }
}

fn dataset_parent(dataset: &Path) -> PathBuf {
    match dataset.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn filter_versions(dataset: MetricsDataset, config: Option<&RankConfig>) -> MetricsDataset {
    let filtered = match config {
        Some(cfg) => dataset.filter_versions(cfg.included_versions(), cfg.excluded_versions()),
        None => dataset,
    };
    if filtered.is_empty() {
        warn!("no versions left after filtering");
    }
    filtered
}

/// Ranks one batch project directory, returning its name, the pending release's line
/// count and the report.
fn rank_project(dir: &Path) -> Result<(String, Option<f64>, RankReport), RankError> {
    let cfg = config::load_config(dir)?.ok_or_else(|| {
        RankError::PathNotFound(dir.join(config::DEFAULT_CONFIG_FILE).display().to_string())
    })?;

    let full = dataset::load_dataset(&config::dataset_path(dir, &cfg))?;
    let num_lines = full.next_release_value(NUM_LINES_COLUMN);
    let dataset = filter_versions(full, Some(&cfg));
    let rank_report = analyze(&cfg.project.name, &dataset, &cfg.request()?)?;
    Ok((cfg.project.name, num_lines, rank_report))
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_configuration() {
                exit_code::CONFIGURATION
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
