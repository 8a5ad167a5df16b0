//! Command-line interface for grainview.
//!
//! This module provides the CLI structure for the `grainview` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, DeviceStatusArg, DevicesCommand, ExportCommand, OutputFormat, SettingsCommand,
    SortKeyArg, StatusCommand, TableCommand, ThemeCommand, ViewCommand,
};

/// grainview - Browse coastal sediment grain-size samples
///
/// Search, sort, and page through collected samples, summarize them, and
/// export them as CSV.
#[derive(Debug, Parser)]
#[command(name = "grainview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of the sample table
    Table(TableCommand),

    /// List the beach types present in the data
    Types,

    /// Show dashboard totals, averages, and the grain-size series
    Dashboard(ViewCommand),

    /// Show summary statistics
    Report(ViewCommand),

    /// List map markers with their grain-size class
    Map(ViewCommand),

    /// Export samples or the summary report to a file
    #[command(subcommand)]
    Export(ExportCommand),

    /// Manage field devices
    #[command(subcommand)]
    Devices(DevicesCommand),

    /// View or change user settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Show or toggle the color theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Show dataset and local store status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
