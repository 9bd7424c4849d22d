//! Command-line interface for flightlog.
//!
//! This module provides the CLI structure for the `flightlog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CalendarCommand, ConfigCommand, DeleteCommand, ListCommand, OutputFormat,
    StatsCommand,
};

/// flightlog - A personal pilot logbook
///
/// Record flights and browse them as a filterable list, a monthly calendar,
/// or aggregate statistics.
#[derive(Debug, Parser)]
#[command(name = "flightlog")]
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
    /// Log a new flight
    Add(AddCommand),

    /// List flights, newest first
    List(ListCommand),

    /// Delete a flight
    Delete(DeleteCommand),

    /// Show a monthly calendar of flights
    Calendar(CalendarCommand),

    /// Show totals and most used aircraft
    Stats(StatsCommand),

    /// Print every flight as JSON
    Export,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
