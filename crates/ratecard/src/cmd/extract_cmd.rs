//! ratecard-extract - Turn a pasted card listing into JSON artifacts.
//!
//! Reads the listing, parses it into cards, checks each card against the
//! reference table and writes one JSON file per card.
//!
//! # Usage
//!
//! ```bash
//! ratecard-extract
//! ratecard-extract --listing tempcards.txt --output-dir card_json_output
//! ratecard-extract --config ratecard.json -v
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{init_logging, ProjectArgs};
use anyhow::{Context, Result};
use clap::Parser;
use ratecard_importer::{Emitter, EmitterConfig, ReferenceKeySet};
use ratecard_parser::parse_listing_with_stats;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Turn a pasted card listing into JSON artifacts.
#[derive(Parser, Debug)]
#[command(name = "ratecard-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    generate_completions: Option<ShellType>,

    #[command(flatten)]
    project: ProjectArgs,

    /// Listing file to parse (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    listing: Option<PathBuf>,

    /// Reference table to check cards against (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Directory for the JSON artifacts (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Also print every parsed card
    #[arg(long)]
    print: bool,
}

/// Main entry point for the extract command.
pub fn main() -> ExitCode {
    main_with_name("ratecard-extract")
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
    let listing_path = args.listing.as_ref().unwrap_or(&config.listing);
    let reference_path = args.reference.as_ref().unwrap_or(&config.reference);
    let output_dir = args.output_dir.as_ref().unwrap_or(&config.output_dir);

    let mut stdout = io::stdout().lock();

    let listing = match ratecard_loader::load(listing_path) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("  {}", e.hint());
            return Ok(ExitCode::from(1));
        }
    };
    writeln!(
        stdout,
        "Reading {} ({} bytes, {})",
        listing.path.display(),
        listing.size,
        listing.encoding
    )?;
    if listing.is_blank() {
        eprintln!("warning: {} contains only whitespace", listing.path.display());
    }

    let keys = ReferenceKeySet::load_or_empty(reference_path, &config.name_column);
    writeln!(stdout, "Found {} cards in reference", keys.len())?;

    let output = parse_listing_with_stats(&listing.text);
    debug!(stats = ?output.stats, "parsed listing");
    writeln!(stdout, "Found {} cards in listing", output.cards.len())?;

    if args.print {
        for card in &output.cards {
            writeln!(stdout, "{card}")?;
        }
    }

    let emitter = Emitter::new(EmitterConfig::builder().output_dir(output_dir).build());
    let report = emitter
        .emit_all(&output.cards, &keys)
        .context("failed to write card artifacts")?;

    for name in &report.not_found {
        eprintln!("warning: Card not found in reference: {name}");
    }

    writeln!(
        stdout,
        "Created {} JSON files in {}",
        report.written.len(),
        emitter.output_dir().display()
    )?;
    writeln!(stdout, "  Found in reference: {}", report.found)?;
    writeln!(stdout, "  Not found in reference: {}", report.not_found.len())?;

    Ok(ExitCode::SUCCESS)
}
