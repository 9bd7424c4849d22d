//! Plain-text rendering of the list, calendar and statistics views.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::calendar::{CalendarCell, CalendarGrid};
use crate::flight::Flight;
use crate::stats::{format_flight_time, Summary};

/// Shown instead of an empty list.
pub const EMPTY_LIST: &str = "No flights recorded.";

/// Shown instead of an empty aircraft ranking.
pub const NO_DATA: &str = "No data";

/// Width of one calendar column.
const CELL_WIDTH: usize = 7;

/// Format an ISO date as `March 10, 2024`; anything unparsable is returned as-is.
#[must_use]
pub fn format_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_or_else(
        |_| date.to_string(),
        |parsed| parsed.format("%B %-d, %Y").to_string(),
    )
}

/// Render one flight as a block of lines.
#[must_use]
pub fn render_flight(flight: &Flight) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}  [#{}]",
        format_date(&flight.date),
        format_flight_time(flight.time),
        flight.id
    );
    let _ = writeln!(out, "  Aircraft:    {}", flight.aircraft);
    let _ = writeln!(out, "  Route:       {}", flight.route());
    let _ = writeln!(out, "  Weather:     {}", flight.weather);
    let _ = writeln!(out, "  Flight type: {}", flight.flight_type);
    if let Some(instructor) = flight.visible_instructor() {
        let _ = writeln!(out, "  Instructor:  {instructor}");
    }
    if let Some(notes) = flight.visible_notes() {
        let _ = writeln!(out, "  Notes:       {notes}");
    }
    out
}

/// Render a list of flights in the given order, blank line between entries.
#[must_use]
pub fn render_flight_list(flights: &[&Flight]) -> String {
    if flights.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }
    flights
        .iter()
        .map(|flight| render_flight(flight))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a calendar grid, seven columns per row.
///
/// Filler days are shown in parentheses and days with flights carry the
/// count after a `*`.
#[must_use]
pub fn render_calendar(grid: &CalendarGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.month());
    for row in grid.rows() {
        for cell in row {
            let text = match cell {
                CalendarCell::Header { label } => (*label).to_string(),
                CalendarCell::Filler { day } => format!("({day})"),
                CalendarCell::Day {
                    day,
                    flights,
                    has_flights: true,
                } => format!("{day}*{flights}"),
                CalendarCell::Day { day, .. } => day.to_string(),
            };
            let _ = write!(out, "{text:>CELL_WIDTH$}");
        }
        out.push('\n');
    }
    out
}

/// Render totals and the aircraft ranking.
#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total flights: {}", summary.total_flights);
    let _ = writeln!(out, "Total time:    {}", summary.total_time());
    let _ = writeln!(out);
    let _ = writeln!(out, "Top aircraft");
    if summary.top_aircraft.is_empty() {
        let _ = writeln!(out, "  {NO_DATA}");
    } else {
        for usage in &summary.top_aircraft {
            let _ = writeln!(out, "  {:<20} {:>4} flights", usage.aircraft, usage.flights);
        }
    }
    out
}
