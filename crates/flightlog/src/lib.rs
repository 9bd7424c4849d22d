//! `flightlog` - A personal pilot logbook
//!
//! This library keeps an authoritative collection of logged flights, persists
//! it to a single durable slot, and derives the filtered list, monthly
//! calendar and statistics views from it.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod flight;
pub mod logging;
pub mod render;
pub mod stats;
pub mod storage;
pub mod store;
pub mod view;

pub use calendar::{CalendarCell, CalendarGrid, CalendarMonth};
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{filter, filter_flights, FilterCriteria};
pub use flight::{Flight, FlightId, NewFlight};
pub use logging::init_logging;
pub use stats::{format_flight_time, summarize, Summary};
pub use storage::{FlightSlot, MemorySlot, SqliteSlot};
pub use store::FlightStore;
pub use view::{Action, AssumeYes, Confirm, FlightLog, Outcome, RemoveOutcome};
