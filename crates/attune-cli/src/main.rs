//! Attune CLI - Mood analytics and session planning
//!
//! Usage:
//!   attune analytics --file moods.csv        Summarize the last 30 days
//!   attune insights --file moods.csv         Insights for the last 7 days
//!   attune plan --type music --duration 45   Plan a session
//!   attune rules                             Show the active rule tables

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use attune_core::history::HistoryQuery;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let loaded = commands::load_rules(cli.config.as_deref())?;
    let config = &loaded.config;

    match cli.command {
        Commands::Analytics { file, days, user } => {
            commands::cmd_analytics(config, &file, days, user, cli.json)
        }
        Commands::Insights { file, days, user } => {
            commands::cmd_insights(config, &file, days, user, cli.json)
        }
        Commands::Plan {
            session_type,
            duration,
            goals,
            file,
            user,
        } => commands::cmd_plan(
            config,
            &session_type,
            f64::from(duration),
            &goals,
            file.as_deref(),
            user,
            cli.json,
        ),
        Commands::History {
            file,
            days,
            page,
            limit,
            user,
        } => commands::cmd_history(&file, HistoryQuery { days, page, limit }, user, cli.json),
        Commands::Sessions { file, days } => commands::cmd_sessions(&file, days, cli.json),
        Commands::Rules => commands::cmd_rules(&loaded, cli.json),
    }
}
