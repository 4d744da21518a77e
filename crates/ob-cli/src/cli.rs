//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ob_core::{ArrivalMethod, CapabilityTag, Category, CopayRatio, TimeBand, VisitType};

/// Outpatient billing calculator.
///
/// Computes itemized outpatient statements from a fee catalog, deriving
/// context-dependent fees automatically and validating the result.
#[derive(Debug, Parser)]
#[command(name = "ob", version, about, long_about = None)]
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
    /// Compute an itemized statement for one encounter.
    Compute {
        /// Visit type (initial, follow_up).
        #[arg(long, default_value_t = VisitType::FollowUp)]
        visit: VisitType,

        /// Time band (regular, night_early, off_hours, off_hours_special,
        /// holiday, late_night).
        #[arg(long, default_value_t = TimeBand::Regular)]
        time_band: TimeBand,

        /// Arrival method (regular, walk_in, ambulance).
        #[arg(long, default_value_t = ArrivalMethod::Regular)]
        arrival: ArrivalMethod,

        /// Patient age in years.
        #[arg(long, default_value_t = 40)]
        age: u32,

        /// Copay ratio in percent (0, 10, 20, 30, 100).
        #[arg(long, default_value_t = CopayRatio::ThirtyPercent)]
        copay: CopayRatio,

        /// Manual entry to add; may repeat.
        #[arg(long = "add", value_name = "CODE[:QTY]")]
        add: Vec<String>,

        /// Derive companion fees from the entered items.
        #[arg(long)]
        auto: bool,

        /// Output the raw statement as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Browse the fee catalog.
    Catalog {
        /// Only entries in this category.
        #[arg(long)]
        category: Option<Category>,

        /// Only entries carrying this capability tag.
        #[arg(long)]
        tag: Option<CapabilityTag>,

        /// Include entries hidden from the picker.
        #[arg(long)]
        hidden: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
