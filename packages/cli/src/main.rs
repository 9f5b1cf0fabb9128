#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for dengue surveillance.
//!
//! `ingest` turns a raw admission line-list into the canonical summary
//! CSV; every other subcommand runs one analyzer over a summary file and
//! prints its result as JSON on stdout. Logs go to stderr through
//! [`dengue_watch_cli_utils::init_logger`], filtered by `RUST_LOG`.

mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dengue_watch", about = "Dengue surveillance ingestion and analytics")]
struct Cli {
    /// Analysis config TOML; defaults apply to anything it omits
    #[arg(long, global = true, env = "DENGUE_WATCH_CONFIG")]
    config: Option<PathBuf>,
    /// Reference date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a raw admission line-list into the canonical summary CSV
    Ingest {
        /// Raw line-list CSV
        input: PathBuf,
        /// Where to write the summary CSV
        output: PathBuf,
        /// Neighborhood alias table TOML replacing the built-in one
        #[arg(long)]
        aliases: Option<PathBuf>,
        /// Refuse to write the summary if more rows than this fail validation
        #[arg(long)]
        max_errors: Option<u64>,
    },
    /// Classify every neighborhood's recent weekly pattern
    Patterns {
        /// Canonical summary CSV
        summary: PathBuf,
        /// Known neighborhoods, one per line (defaults to those in the summary)
        #[arg(long)]
        neighborhoods: Option<PathBuf>,
    },
    /// Rank neighborhoods by recent deaths
    Deaths {
        /// Canonical summary CSV
        summary: PathBuf,
    },
    /// Compare weekly cases before and after an intervention
    Intervention {
        /// Canonical summary CSV
        summary: PathBuf,
        /// Neighborhood the intervention targeted
        neighborhood: String,
        /// Intervention date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Show the current week and earlier weekly totals for one neighborhood
    Trends {
        /// Canonical summary CSV
        summary: PathBuf,
        /// Neighborhood to report on
        neighborhood: String,
        /// Number of earlier weeks (defaults to `trends.default_weeks`)
        #[arg(long)]
        weeks: Option<usize>,
    },
    /// List rising neighborhoods and the neighbors at risk from them
    Hotspots {
        /// Canonical summary CSV
        summary: PathBuf,
        /// Adjacency table TOML
        #[arg(long)]
        adjacency: PathBuf,
        /// Known neighborhoods, one per line (defaults to those in the summary)
        #[arg(long)]
        neighborhoods: Option<PathBuf>,
    },
    /// Summarize patterns and recent deaths for every neighborhood
    Summary {
        /// Canonical summary CSV
        summary: PathBuf,
        /// Known neighborhoods, one per line (defaults to those in the summary)
        #[arg(long)]
        neighborhoods: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = dengue_watch_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let clock = commands::Clock::new(cli.as_of);

    match cli.command {
        Commands::Ingest {
            input,
            output,
            aliases,
            max_errors,
        } => commands::ingest(&multi, &input, &output, aliases.as_deref(), max_errors)?,
        Commands::Patterns {
            summary,
            neighborhoods,
        } => commands::patterns(&summary, neighborhoods.as_deref(), &config, &clock)?,
        Commands::Deaths { summary } => commands::deaths(&summary, &config, &clock)?,
        Commands::Intervention {
            summary,
            neighborhood,
            date,
        } => commands::intervention(&summary, &neighborhood, date, &config)?,
        Commands::Trends {
            summary,
            neighborhood,
            weeks,
        } => commands::trends(&summary, &neighborhood, weeks, &config, &clock)?,
        Commands::Hotspots {
            summary,
            adjacency,
            neighborhoods,
        } => commands::hotspots(
            &summary,
            &adjacency,
            neighborhoods.as_deref(),
            &config,
            &clock,
        )?,
        Commands::Summary {
            summary,
            neighborhoods,
        } => commands::summary(&summary, neighborhoods.as_deref(), &config, &clock)?,
    }

    Ok(())
}
