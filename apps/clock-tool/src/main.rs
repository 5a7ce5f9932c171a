//! CLI tool for settings management and results inspection.
//!
//! Provides commands for:
//! - Creating, validating and editing settings files
//! - Previewing the period sequence a settings file produces
//! - Listing recorded results

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use uwh_clock_core::sequence::PeriodSequence;
use uwh_clock_core::{ClockConfig, ResultsLog, SystemWallClock, WallClock};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, default_value = "./settings.json", global = true)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a settings file
    Validate,
    /// Change one setting and save the file
    Set { key: String, value: String },
    /// List setting names
    Keys,
    /// Show the periods a match would run through
    Sequence,
    /// Print recorded results
    Results {
        #[arg(long, default_value = "./results")]
        dir: PathBuf,
        /// Also print penalties
        #[arg(long)]
        penalties: bool,
    },
}

fn format_duration(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::init();

    match cli.command {
        Command::Init { force } => {
            if cli.settings.exists() && !force {
                anyhow::bail!(
                    "{} already exists, use --force to overwrite",
                    cli.settings.display()
                );
            }
            ClockConfig::default().save_to_file(&cli.settings)?;
            println!("Wrote default settings to {}", cli.settings.display());
        }
        Command::Validate => {
            let config = ClockConfig::from_file(&cli.settings)
                .with_context(|| format!("Failed to load {}", cli.settings.display()))?;
            config.validate()?;
            println!("{} is valid", cli.settings.display());
        }
        Command::Set { key, value } => {
            let mut config = ClockConfig::from_file(&cli.settings)
                .with_context(|| format!("Failed to load {}", cli.settings.display()))?;
            let change = config.apply_setting(&key, &value)?;
            config.validate()?;
            config.save_to_file(&cli.settings)?;
            if change.structural {
                println!(
                    "Set {} = {} (restarts the match on a running clock)",
                    key, value
                );
            } else {
                println!("Set {} = {}", key, value);
            }
        }
        Command::Keys => {
            for key in ClockConfig::SETTING_KEYS {
                println!("{}", key);
            }
        }
        Command::Sequence => {
            let config = ClockConfig::from_file(&cli.settings)
                .with_context(|| format!("Failed to load {}", cli.settings.display()))?;
            config.validate()?;
            let sequence = PeriodSequence::build(&config, SystemWallClock.now());
            for (index, period) in sequence.periods().iter().enumerate() {
                let duration = period
                    .duration_seconds
                    .map(format_duration)
                    .unwrap_or_else(|| "open".to_string());
                println!("{:>2}  {:<28} {}", index, period.name(), duration);
            }
        }
        Command::Results { dir, penalties } => {
            let log = ResultsLog::open(&dir)?;
            for row in log.read_results()? {
                println!(
                    "#{:<4} {}  White {:>2} - {:<2} Black  {}",
                    row.game_number,
                    row.finished_at,
                    row.white_score,
                    row.black_score,
                    row.scorers
                );
            }
            if penalties {
                for row in log.read_penalties()? {
                    println!(
                        "#{:<4} {} #{} {}",
                        row.game_number,
                        row.team,
                        row.cap,
                        row.duration.label()
                    );
                }
            }
        }
    }

    Ok(())
}
