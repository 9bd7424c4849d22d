//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::FilterCriteria;
use crate::flight::NewFlight;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Flight date, YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Flight time in minutes
    #[arg(short, long, allow_negative_numbers = true)]
    pub time: i64,

    /// Aircraft type or registration
    #[arg(short, long)]
    pub aircraft: String,

    /// Departure airport
    #[arg(long = "from", value_name = "AIRPORT")]
    pub departure: String,

    /// Arrival airport
    #[arg(long = "to", value_name = "AIRPORT")]
    pub arrival: String,

    /// Weather conditions
    #[arg(short, long)]
    pub weather: String,

    /// Flight type (solo, dual, cross-country, ...)
    #[arg(long = "type", value_name = "TYPE")]
    pub flight_type: String,

    /// Instructor name
    #[arg(short, long)]
    pub instructor: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl AddCommand {
    /// Build the entry, using `today` when no date was given.
    #[must_use]
    pub fn into_entry(self, today: &str) -> NewFlight {
        NewFlight {
            date: self.date.unwrap_or_else(|| today.to_string()),
            time: self.time,
            aircraft: self.aircraft,
            departure_airport: self.departure,
            arrival_airport: self.arrival,
            weather: self.weather,
            instructor: self.instructor,
            flight_type: self.flight_type,
            notes: self.notes,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Match aircraft, departure or arrival airport (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Only flights on or after this date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub start_date: String,

    /// Only flights on or before this date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub end_date: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

impl ListCommand {
    /// The filter criteria these arguments describe.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(&self.search, &self.start_date, &self.end_date)
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the flight to delete
    pub id: i64,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Calendar command arguments.
#[derive(Debug, Args)]
pub struct CalendarCommand {
    /// Year to show (defaults to the current year)
    #[arg(short, long, requires = "month")]
    pub year: Option<i32>,

    /// Month to show, 1-12 (defaults to the current month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Move this many months from the selected month (negative goes back)
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i32,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
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

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
