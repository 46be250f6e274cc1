//! ratecard-merge - Fold card artifacts back into the reference tables.
//!
//! Every artifact's Everywhere rate acts as a floor for that card's row.
//!
//! # Usage
//!
//! ```bash
//! ratecard-merge
//! ratecard-merge --output-dir card_json_output --target cards.csv
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{init_logging, ProjectArgs};
use anyhow::{Context, Result};
use clap::Parser;
use ratecard_importer::{load_artifacts, merge_file};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Fold card artifacts back into the reference tables.
#[derive(Parser, Debug)]
#[command(name = "ratecard-merge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    generate_completions: Option<ShellType>,

    #[command(flatten)]
    project: ProjectArgs,

    /// Directory holding the JSON artifacts (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Table to update; repeat for several (overrides the config)
    #[arg(short, long = "target", value_name = "FILE")]
    targets: Vec<PathBuf>,
}

/// Main entry point for the merge command.
pub fn main() -> ExitCode {
    main_with_name("ratecard-merge")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_logging(args.project.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = args.project.load_config()?;
    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);
    let targets = if args.targets.is_empty() {
        &config.merge_targets
    } else {
        &args.targets
    };

    let mut stdout = io::stdout().lock();

    let cards = load_artifacts(output_dir)
        .with_context(|| format!("failed to load artifacts from {}", output_dir.display()))?;
    writeln!(
        stdout,
        "Loaded {} cards from {}",
        cards.len(),
        output_dir.display()
    )?;

    for target in targets {
        if !target.exists() {
            eprintln!("warning: File not found: {}", target.display());
            continue;
        }

        let report = merge_file(target, &config.name_column, &cards)?;
        for name in &report.not_found {
            eprintln!("warning: Card not found in {}: {name}", target.display());
        }
        writeln!(
            stdout,
            "Updated {} cards in {}",
            report.updated,
            target.display()
        )?;
        if !report.not_found.is_empty() {
            writeln!(stdout, "  {} cards not found", report.not_found.len())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
