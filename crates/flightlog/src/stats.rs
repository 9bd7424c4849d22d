//! Aggregate statistics over the full flight collection.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::DEFAULT_TOP_AIRCRAFT;
use crate::flight::Flight;

/// Unit label for hours in formatted durations.
pub const HOUR_UNIT: &str = "hr";

/// Unit label for minutes in formatted durations.
pub const MINUTE_UNIT: &str = "min";

/// How often one aircraft appears in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AircraftUsage {
    /// Aircraft name, exactly as logged.
    pub aircraft: String,
    /// Number of flights in it.
    pub flights: usize,
}

/// Totals over a flight collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of flights.
    pub total_flights: usize,
    /// Sum of all flight durations in minutes.
    pub total_minutes: i64,
    /// Most used aircraft, most flights first.
    pub top_aircraft: Vec<AircraftUsage>,
}

impl Summary {
    /// Whether there is nothing to report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_flights == 0
    }

    /// Total time as `H hr M min`, always with both parts.
    #[must_use]
    pub fn total_time(&self) -> String {
        format_total_time(self.total_minutes)
    }
}

/// Summarize `flights` with the default ranking size.
#[must_use]
pub fn summarize(flights: &[Flight]) -> Summary {
    summarize_top(flights, DEFAULT_TOP_AIRCRAFT)
}

/// Summarize `flights`, ranking at most `top_n` aircraft.
#[must_use]
pub fn summarize_top(flights: &[Flight], top_n: usize) -> Summary {
    Summary {
        total_flights: flights.len(),
        total_minutes: flights.iter().map(|flight| flight.time).sum(),
        top_aircraft: top_aircraft(flights, top_n),
    }
}

/// Count flights per exact aircraft string and keep the `n` most used.
///
/// Aircraft with equal counts keep the order in which they first appear in
/// `flights`.
#[must_use]
pub fn top_aircraft(flights: &[Flight], n: usize) -> Vec<AircraftUsage> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut usage: Vec<AircraftUsage> = Vec::new();

    for flight in flights {
        let index = *position.entry(flight.aircraft.as_str()).or_insert_with(|| {
            usage.push(AircraftUsage {
                aircraft: flight.aircraft.clone(),
                flights: 0,
            });
            usage.len() - 1
        });
        usage[index].flights += 1;
    }

    // Stable sort keeps first-seen order among ties
    usage.sort_by(|a, b| b.flights.cmp(&a.flights));
    usage.truncate(n);
    usage
}

/// Split minutes into whole hours and remaining minutes.
///
/// Hours are floored and the remainder keeps the sign of `minutes`, so
/// `-90` splits into `(-2, -30)`.
#[must_use]
pub fn split_minutes(minutes: i64) -> (i64, i64) {
    (minutes.div_euclid(60), minutes % 60)
}

/// Format one flight's duration: `2 hr 5 min`, or `45 min` under an hour.
#[must_use]
pub fn format_flight_time(minutes: i64) -> String {
    let (hours, mins) = split_minutes(minutes);
    if hours > 0 {
        format!("{hours} {HOUR_UNIT} {mins} {MINUTE_UNIT}")
    } else {
        format!("{mins} {MINUTE_UNIT}")
    }
}

/// Format an aggregate duration, always showing hours: `0 hr 45 min`.
#[must_use]
pub fn format_total_time(minutes: i64) -> String {
    let (hours, mins) = split_minutes(minutes);
    format!("{hours} {HOUR_UNIT} {mins} {MINUTE_UNIT}")
}
