//! Command-line argument definitions.

use std::path::PathBuf;

use bt_core::{ActivityType, FeedingType};
use clap::{Parser, Subcommand};

/// Baby activity tracker.
///
/// Logs diapers, feedings and sleep, and summarizes them per day and week.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log an activity (poop, pee, breast, bottle, sleep-start, sleep-end).
    Log {
        /// Activity type.
        kind: ActivityType,

        /// When it happened (default: now). Accepts ISO 8601,
        /// 'YYYY-MM-DD HH:MM', 'HH:MM' or relative like '20 minutes ago'.
        #[arg(long)]
        at: Option<String>,
    },

    /// Remove an activity by id.
    Remove {
        /// Activity id as shown by `bt list`.
        id: String,
    },

    /// List logged activities, newest first.
    List {
        /// Show at most this many activities.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Summarize today.
    Today {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize a given day.
    Day {
        /// Day to summarize: YYYY-MM-DD, 'today' or 'yesterday'.
        date: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a seven-day chart.
    Week {
        /// Weeks back from the current one (negative values clamp to 0).
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export all activities as a text report or JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output the raw activity records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace all activities with records read from a JSON file.
    Import {
        /// Path to read, or '-' for stdin.
        path: PathBuf,
    },

    /// Delete all activities.
    Clear {
        /// Confirm deleting every activity.
        #[arg(long)]
        yes: bool,
    },

    /// Show or update the baby's profile.
    Profile {
        /// Baby's display name.
        #[arg(long)]
        name: Option<String>,

        /// Which feeding rows to show: breast, bottle or mixed.
        #[arg(long)]
        feeding_type: Option<FeedingType>,
    },

    /// Show current tracker status.
    Status,
}
