//! `flightlog` - CLI for the flight logbook
//!
//! This binary is a thin presentation layer: it parses commands, routes them
//! to the flight log as actions, and prints the resulting views.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, BufRead, Write};

use chrono::Local;
use clap::Parser;
use tracing::warn;

use flightlog::cli::{
    AddCommand, CalendarCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand,
    OutputFormat, StatsCommand,
};
use flightlog::render::{render_calendar, render_flight_list, render_summary};
use flightlog::{
    init_logging, Action, AssumeYes, CalendarMonth, Config, FlightLog, FlightStore, Outcome,
    RemoveOutcome, SqliteSlot,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Add(add_cmd) => with_log(&config, |log| handle_add(log, add_cmd)),
        Command::List(list_cmd) => with_log(&config, |log| handle_list(log, &list_cmd)),
        Command::Delete(delete_cmd) => with_log(&config, |log| handle_delete(log, &delete_cmd)),
        Command::Calendar(calendar_cmd) => {
            with_log(&config, |log| handle_calendar(log, &calendar_cmd))
        }
        Command::Stats(stats_cmd) => with_log(&config, |log| handle_stats(log, &config, &stats_cmd)),
        Command::Export => with_log(&config, |log| {
            println!("{}", serde_json::to_string_pretty(log.flights())?);
            Ok(())
        }),
    }
}

/// Run `f` against the stored flight log, then surface any failed save.
fn with_log(
    config: &Config,
    f: impl FnOnce(&mut FlightLog<SqliteSlot>) -> CliResult,
) -> CliResult {
    let mut log = FlightLog::new(FlightStore::open(open_slot(config)?));
    f(&mut log)?;
    log.flush()?;
    Ok(())
}

/// Open the configured database, falling back to an in-memory slot.
fn open_slot(config: &Config) -> flightlog::Result<SqliteSlot> {
    let path = config.database_path();
    let key = config.storage.slot_key.as_str();
    SqliteSlot::open(&path, key).or_else(|e| {
        warn!(
            path = %path.display(),
            error = %e,
            "Storage unavailable, changes will not be kept"
        );
        SqliteSlot::open_in_memory(key)
    })
}

fn handle_add(log: &mut FlightLog<SqliteSlot>, cmd: AddCommand) -> CliResult {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    if let Outcome::Added(id) = log.dispatch(Action::Add(cmd.into_entry(&today)), &mut AssumeYes)? {
        println!("Flight saved (#{id}).");
    }
    Ok(())
}

fn handle_list(log: &mut FlightLog<SqliteSlot>, cmd: &ListCommand) -> CliResult {
    log.dispatch(Action::Filter(cmd.criteria()), &mut AssumeYes)?;
    let flights = log.list_view();

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&flights)?),
        OutputFormat::Plain => {
            print!("{}", render_flight_list(&flights));
            if !log.criteria().is_empty() {
                println!();
                println!("{} of {} flights match", flights.len(), log.flights().len());
            }
        }
    }
    Ok(())
}

fn handle_delete(log: &mut FlightLog<SqliteSlot>, cmd: &DeleteCommand) -> CliResult {
    let mut confirm = |prompt: &str| cmd.yes || ask_yes_no(prompt);

    match log.dispatch(Action::Remove(cmd.id), &mut confirm)? {
        Outcome::Remove(RemoveOutcome::Removed) => println!("Flight #{} deleted.", cmd.id),
        Outcome::Remove(RemoveOutcome::NotFound) => println!("No flight with id {}.", cmd.id),
        Outcome::Remove(RemoveOutcome::Declined) => println!("Cancelled."),
        _ => {}
    }
    Ok(())
}

/// Ask on stdin; anything but `y`/`yes` (or a read error) means no.
fn ask_yes_no(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            warn!(error = %e, "Could not read confirmation");
            false
        }
    }
}

fn handle_calendar(log: &mut FlightLog<SqliteSlot>, cmd: &CalendarCommand) -> CliResult {
    let current = CalendarMonth::current();
    let base = match cmd.month {
        Some(month) => CalendarMonth::new(cmd.year.unwrap_or(current.year()), month)?,
        None => current,
    };

    log.dispatch(Action::ShowMonth(base), &mut AssumeYes)?;
    if cmd.offset != 0 {
        log.dispatch(Action::ShiftMonth(cmd.offset), &mut AssumeYes)?;
    }

    let grid = log.calendar()?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print!("{}", render_calendar(&grid));
    }
    Ok(())
}

fn handle_stats(log: &FlightLog<SqliteSlot>, config: &Config, cmd: &StatsCommand) -> CliResult {
    let summary = log.summary(config.stats.top_aircraft);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary));

        let slot = log.store().slot();
        println!();
        println!("Database:   {}", slot.path().display());
        println!(
            "Last saved: {}",
            slot.updated_at()?.as_deref().unwrap_or("never")
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Stats]");
                println!("  Top aircraft:       {}", config.stats.top_aircraft);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
