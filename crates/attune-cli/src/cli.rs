//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Attune - Mood analytics and therapy session planning
#[derive(Parser)]
#[command(name = "attune")]
#[command(about = "Mood analytics, insights and session planning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Rule table config (falls back to the user override, then built-in rules)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of a report
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize observations: averages, daily series, top emotions/triggers
    Analytics {
        /// Observation file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Window length in days
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// Only include this user's observations
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Derive insights from recent observations
    Insights {
        /// Observation file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Window length in days
        #[arg(short, long, default_value = "7")]
        days: i64,

        /// Only include this user's observations
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Plan a therapy session
    Plan {
        /// Session type: music, art, combined, guided
        #[arg(short = 't', long = "type")]
        session_type: String,

        /// Session length in minutes
        #[arg(short, long, default_value = "30", value_parser = clap::value_parser!(u32).range(5..=120))]
        duration: u32,

        /// Session goal (repeatable): stress_reduction, mood_improvement,
        /// anxiety_relief, emotional_regulation, self_expression, mindfulness
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// Observation file used for recommendations
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Only include this user's observations
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// List observation history, newest first
    History {
        /// Observation file (.json or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Window length in days
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Entries per page
        #[arg(short, long, default_value = "30")]
        limit: u32,

        /// Only include this user's observations
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Summarize completed and active therapy sessions
    Sessions {
        /// Session file (.json)
        #[arg(short, long)]
        file: PathBuf,

        /// Window length in days
        #[arg(short, long, default_value = "30")]
        days: i64,
    },

    /// Show the effective rule tables and where they came from
    Rules,
}
