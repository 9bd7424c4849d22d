//! Monthly calendar grid.
//!
//! A grid is a flat run of cells meant to be laid out seven per row: the
//! weekday headers (Sunday first), filler cells carrying the trailing days of
//! the previous month, then one cell per day of the month annotated with the
//! number of flights logged on that date. The calendar always counts the full
//! collection; list filters never apply to it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::flight::Flight;

/// Weekday header labels, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A displayed year/month, held as the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// The month `month` (1-12) of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMonth`] for a month outside `1..=12` and
    /// [`Error::DateOutOfRange`] for a year chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth { month });
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(Error::DateOutOfRange { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    /// The month containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// The first day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Number of days in the month: the day before the first of the next month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // Only the last representable December has no next month
            .map_or(31, |last| last.day())
    }

    /// Weekday index of the first day, 0 = Sunday.
    #[must_use]
    pub fn leading_weekday(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// The month `delta` months away (negative goes back).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] if the result cannot be represented.
    pub fn shift(&self, delta: i32) -> Result<Self> {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.first.checked_add_months(months)
        } else {
            self.first.checked_sub_months(months)
        };
        shifted.map(|first| Self { first }).ok_or(Error::DateOutOfRange {
            year: self.year(),
            month: self.month(),
        })
    }

    /// The following month.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] past the last representable month.
    pub fn next(&self) -> Result<Self> {
        self.shift(1)
    }

    /// The preceding month.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] before the first representable month.
    pub fn prev(&self) -> Result<Self> {
        self.shift(-1)
    }

    /// ISO date string for `day` of this month, as stored on flights.
    #[must_use]
    pub fn date_key(&self, day: u32) -> String {
        format!("{:04}-{:02}-{day:02}", self.year(), self.month())
    }
}

impl Default for CalendarMonth {
    fn default() -> Self {
        Self::current()
    }
}

/// Serialized as `YYYY-MM`.
impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:04}-{:02}", self.year(), self.month()))
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%B %Y"))
    }
}

/// One cell of the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarCell {
    /// Weekday column header.
    Header {
        /// Short weekday name.
        label: &'static str,
    },
    /// A trailing day of the previous month, shown for alignment.
    Filler {
        /// Day number in the previous month.
        day: u32,
    },
    /// A day of the displayed month.
    Day {
        /// Day number, starting at 1.
        day: u32,
        /// Flights logged on this date.
        flights: usize,
        /// Whether at least one flight was logged.
        has_flights: bool,
    },
}

/// A rendered month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    month: CalendarMonth,
    cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// The month this grid shows.
    #[must_use]
    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    /// All cells: headers, fillers, then days.
    #[must_use]
    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    /// Number of filler cells before day 1.
    #[must_use]
    pub fn filler_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, CalendarCell::Filler { .. }))
            .count()
    }

    /// Rows of seven cells; the last row may be shorter.
    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(WEEKDAY_LABELS.len())
    }
}

/// Group flights by their exact `date` string.
///
/// Several flights on the same day all land in that day's list.
#[must_use]
pub fn group_by_date(flights: &[Flight]) -> BTreeMap<&str, Vec<&Flight>> {
    let mut by_date: BTreeMap<&str, Vec<&Flight>> = BTreeMap::new();
    for flight in flights {
        by_date.entry(flight.date.as_str()).or_default().push(flight);
    }
    by_date
}

/// Build the grid for `month` over the full collection.
///
/// # Errors
///
/// Returns [`Error::DateOutOfRange`] if the filler days before the first
/// representable month are requested.
pub fn render_month(month: CalendarMonth, flights: &[Flight]) -> Result<CalendarGrid> {
    let by_date = group_by_date(flights);
    let leading = month.leading_weekday();
    let days = month.days_in_month();

    let mut cells = Vec::with_capacity(WEEKDAY_LABELS.len() + (leading + days) as usize);
    cells.extend(
        WEEKDAY_LABELS
            .iter()
            .map(|&label| CalendarCell::Header { label }),
    );

    for back in (1..=leading).rev() {
        let date = month
            .first_day()
            .checked_sub_days(Days::new(u64::from(back)))
            .ok_or(Error::DateOutOfRange {
                year: month.year(),
                month: month.month(),
            })?;
        cells.push(CalendarCell::Filler { day: date.day() });
    }

    for day in 1..=days {
        let flights = by_date
            .get(month.date_key(day).as_str())
            .map_or(0, Vec::len);
        cells.push(CalendarCell::Day {
            day,
            flights,
            has_flights: flights > 0,
        });
    }

    Ok(CalendarGrid { month, cells })
}

/// Build the grid for `month` (1-12) of `year`.
///
/// # Errors
///
/// Returns an error for an invalid or unrepresentable month.
pub fn render(year: i32, month: u32, flights: &[Flight]) -> Result<CalendarGrid> {
    render_month(CalendarMonth::new(year, month)?, flights)
}
