// version-bump-core/src/lib.rs

// declare modules
pub mod config;
pub mod driver;
pub mod patterns;
pub mod rewriter;
pub mod utils;

// re-export key structs/functions for the cli crate
pub use anyhow::{Context, Result};
pub use clap::Parser;
pub use console::style;
pub use dotenv::dotenv;

pub use crate::config::{CONFIG_FILE_NAME, VersionBumpConfig};
pub use crate::driver::{CheckReport, FileReport, FileVersions, ProjectFiles, VersionUpdater};
pub use crate::patterns::{CHANGELOG_FILE, PatternRegistry, README_FILE, VersionPattern};
pub use crate::rewriter::{UpdateResult, VersionRewriter};
pub use crate::utils::init_logging;

use clap::builder::NonEmptyStringValueParser;
use std::path::PathBuf;

// argument parsing struct, shared with the cli crate
#[derive(Parser, Debug, Clone)]
#[command(name = "version-bump")]
#[command(about = "update version numbers in project files", long_about = None)]
pub struct CoreCliArgs {
    /// new version number to write into every candidate file
    #[arg(long, value_name = "VERSION", value_parser = NonEmptyStringValueParser::new())]
    pub update: Option<String>,

    /// print the versions currently found in each candidate file
    #[arg(long)]
    pub check: bool,

    /// report what --update would change without writing anything
    #[arg(long, requires = "update")]
    pub dry_run: bool,

    /// project root holding the candidate files
    #[arg(short, long, env = "VERSION_BUMP_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// config file (defaults to version-bump.toml in the project root, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// what a flow run did, for callers that want more than the printed lines
#[derive(Debug, Clone, Default)]
pub struct FlowOutcome {
    pub updates: Option<Vec<FileReport>>,
    pub check: Option<CheckReport>,
}

/// build the updater for a project root and optional config path
pub fn build_updater(root: PathBuf, config: Option<PathBuf>) -> Result<VersionUpdater> {
    let config = VersionBumpConfig::load(&root, config.as_deref())?;
    let registry = config
        .registry()
        .context("invalid version pattern in config")?;
    let files = ProjectFiles::new(root, config.candidate_files());
    Ok(VersionUpdater::new(files, VersionRewriter::new(registry)))
}

// the update/check flow: update first so a combined run checks the new state,
// or the previewed state in a dry run
pub fn execute_version_flow(args: CoreCliArgs) -> Result<FlowOutcome> {
    let mut outcome = FlowOutcome::default();
    if args.update.is_none() && !args.check {
        return Ok(outcome);
    }

    let updater = build_updater(args.root, args.config)?;

    if let Some(version) = args.update.as_deref() {
        let reports = updater.update(version, args.dry_run)?;
        for report in &reports {
            print_update(report, args.dry_run);
        }
        outcome.updates = Some(reports);
    }

    if args.check {
        let report = match args.update.as_deref() {
            Some(version) if args.dry_run => {
                println!(
                    "{}",
                    style(format!(
                        "dry run: showing versions as they would be after updating to {version}"
                    ))
                    .dim()
                );
                updater.check_preview(version)?
            }
            _ => updater.check()?,
        };
        print_check(&report);
        outcome.check = Some(report);
    }

    Ok(outcome)
}

fn print_update(report: &FileReport, dry_run: bool) {
    match (report.result, dry_run) {
        (UpdateResult::Updated, false) => println!(
            "{}",
            style(format!("Updated version in {}", report.file_name)).green()
        ),
        (UpdateResult::Updated, true) => println!(
            "{}",
            style(format!("Would update version in {}", report.file_name)).cyan()
        ),
        (UpdateResult::Unchanged, _) => println!(
            "{}",
            style(format!("No version pattern found in {}", report.file_name)).yellow()
        ),
    }
}

fn print_check(report: &CheckReport) {
    for file in &report.files {
        if file.versions.is_empty() {
            println!("{}: {}", file.file_name, style("no version found").dim());
        } else {
            println!("{}: {}", file.file_name, file.versions.join(", "));
        }
    }

    let distinct = report.distinct_versions();
    match distinct.as_slice() {
        [] => {}
        [only] => println!(
            "{}",
            style(format!("All files agree on version {only}")).green()
        ),
        many => println!(
            "{}",
            style(format!("Version mismatch across files: {}", many.join(", ")))
                .yellow()
                .bold()
        ),
    }
}
