use crate::config::toml_config::DEFAULT_CONFIG_PATH;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-alert")]
#[command(about = "Warehouse inventory expiry alerts delivered by voice call")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build the expiry report and place the voice call (default)
    Alert {
        /// Compute and preview the narration without calling anyone
        #[arg(long)]
        dry_run: bool,
    },
    /// Clean the CSV export into the JSONL inventory store
    Ingest {
        /// Reference date for the Expiring_Soon flag (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List records flagged Expiring_Soon by the last ingest
    Expiring,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Alert { dry_run: false })
    }
}
