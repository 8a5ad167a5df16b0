//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::devices::DeviceStatus;
use crate::view::{SortDirection, SortKey};

/// Table command arguments.
#[derive(Debug, Args)]
pub struct TableCommand {
    /// Search location and device id (case-insensitive)
    #[arg(long)]
    pub query: Option<String>,

    /// Only show this beach type ("all" for every type)
    #[arg(short, long)]
    pub beach_type: Option<String>,

    /// Sort column (defaults to the configured column)
    #[arg(short, long, value_enum)]
    pub sort: Option<SortKeyArg>,

    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl TableCommand {
    /// Direction requested on the command line, if any.
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        if self.asc {
            Some(SortDirection::Ascending)
        } else if self.desc {
            Some(SortDirection::Descending)
        } else {
            None
        }
    }
}

/// Arguments shared by the summary views.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export commands.
#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Export every sample as CSV
    Csv {
        /// Output directory (defaults to the configured directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Export the summary report as text
    Report {
        /// Output directory (defaults to the configured directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

/// Device registry commands.
#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    List {
        /// Search device id, location, and state
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Register a new device
    Add {
        /// Device identifier
        #[arg(long)]
        device_id: String,

        /// Deployment location
        #[arg(long)]
        location: String,

        /// Administrative region
        #[arg(long)]
        state: String,

        /// Operational status
        #[arg(long, value_enum, default_value = "active")]
        status: DeviceStatusArg,
    },

    /// Change fields of a registered device
    Update {
        /// Registry id of the device
        id: String,

        /// New device identifier
        #[arg(long)]
        device_id: Option<String>,

        /// New deployment location
        #[arg(long)]
        location: Option<String>,

        /// New administrative region
        #[arg(long)]
        state: Option<String>,

        /// New operational status
        #[arg(long, value_enum)]
        status: Option<DeviceStatusArg>,
    },

    /// Remove a device
    Remove {
        /// Registry id of the device
        id: String,
    },
}

/// Settings commands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Change one setting
    Set {
        /// Setting key, e.g. `notifications.email` or `language`
        key: String,

        /// New value
        value: String,
    },

    /// Restore default settings
    Reset,
}

/// Theme commands.
#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the active theme
    Show,

    /// Switch between light and dark
    Toggle,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort column argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    /// Location name
    Location,
    /// Collection time
    Timestamp,
    /// Grain size
    GrainSize,
    /// Temperature
    Temperature,
    /// Humidity
    Humidity,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Location => Self::Location,
            SortKeyArg::Timestamp => Self::Timestamp,
            SortKeyArg::GrainSize => Self::GrainSize,
            SortKeyArg::Temperature => Self::Temperature,
            SortKeyArg::Humidity => Self::Humidity,
        }
    }
}

/// Device status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceStatusArg {
    /// Reporting normally
    Active,
    /// Taken out of service
    Inactive,
}

impl From<DeviceStatusArg> for DeviceStatus {
    fn from(arg: DeviceStatusArg) -> Self {
        match arg {
            DeviceStatusArg::Active => Self::Active,
            DeviceStatusArg::Inactive => Self::Inactive,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
