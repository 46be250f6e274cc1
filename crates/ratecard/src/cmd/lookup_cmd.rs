//! ratecard-lookup - Show one card's rewards from the reference table.
//!
//! # Usage
//!
//! ```bash
//! ratecard-lookup "Chase Sapphire Reserve"
//! ratecard-lookup --reference cards.csv "Amex Gold"
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{init_logging, ProjectArgs};
use anyhow::Result;
use clap::{CommandFactory, Parser};
use ratecard_core::format_rate;
use ratecard_importer::{CardMatch, MatchKind, ReferenceTable};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

const RULE_WIDTH: usize = 60;

/// Show one card's rewards from the reference table.
#[derive(Parser, Debug)]
#[command(name = "ratecard-lookup")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    generate_completions: Option<ShellType>,

    #[command(flatten)]
    project: ProjectArgs,

    /// Reference table to search (overrides the lookup candidates)
    #[arg(short, long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Card name to look up; several words are joined with spaces
    #[arg(value_name = "CARD NAME")]
    name: Vec<String>,
}

/// Main entry point for the lookup command.
pub fn main() -> ExitCode {
    main_with_name("ratecard-lookup")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    if args.name.is_empty() {
        let mut cmd = Args::command();
        eprintln!("{}", cmd.render_usage());
        eprintln!("Example: {bin_name} \"Chase Sapphire Reserve\"");
        return ExitCode::from(1);
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
    let candidates = args
        .reference
        .as_ref()
        .map_or(config.lookup_candidates.as_slice(), std::slice::from_ref);

    let Some(path) = candidates.iter().find(|path| path.exists()) else {
        eprintln!("error: no reference table found. Checked:");
        for path in candidates {
            eprintln!("  - {}", path.display());
        }
        return Ok(ExitCode::from(1));
    };

    let table = ReferenceTable::load(path, &config.name_column)?;
    let query = args.name.join(" ");

    let Some(card) = table.find(&query) else {
        eprintln!("Card not found: {query}");
        return Ok(ExitCode::from(1));
    };
    if card.kind == MatchKind::Partial {
        debug!(query, card = %card.name, "partial match");
    }

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, &card)?;
    Ok(ExitCode::SUCCESS)
}

/// Render the human-readable report for a matched card.
fn write_report<W: Write>(w: &mut W, card: &CardMatch) -> io::Result<()> {
    writeln!(w, "Card: {}", card.name)?;
    writeln!(w)?;

    if card.rewards.is_empty() {
        writeln!(w, "No rewards found")?;
        return Ok(());
    }

    let summary = card.summary();
    if !summary.above_baseline.is_empty() {
        writeln!(w, "Rewards (above baseline):")?;
        writeln!(w, "{}", "-".repeat(RULE_WIDTH))?;
        for (category, rate) in &summary.above_baseline {
            writeln!(w, "  {category}: {}%", format_rate(*rate))?;
        }
        writeln!(w)?;
    }

    if summary.baseline > 0.0 {
        let baseline = format_rate(summary.baseline);
        writeln!(w, "Baseline (Everywhere): {baseline}%")?;
        writeln!(w, "  (All other categories earn at least {baseline}%)")?;
        writeln!(w)?;
    }

    writeln!(w, "Total reward categories: {}", summary.total())
}
