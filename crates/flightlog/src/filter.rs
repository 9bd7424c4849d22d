//! Search and date-range filtering.
//!
//! A flight passes when the query matches its aircraft or one of its
//! airports (case-insensitive substring) and its date lies inside the
//! optional inclusive range. Empty criteria match everything.

use serde::{Deserialize, Serialize};

use crate::flight::Flight;

/// Active search criteria for the list view.
///
/// Empty strings mean "no constraint". Dates are compared as ISO strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Text matched against aircraft and airports.
    pub query: String,
    /// Earliest date to include, `YYYY-MM-DD`.
    pub start_date: String,
    /// Latest date to include, `YYYY-MM-DD`.
    pub end_date: String,
}

impl FilterCriteria {
    /// Build criteria from a query and an optional date range.
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Whether these criteria match every flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.start_date.is_empty() && self.end_date.is_empty()
    }

    /// Reset every criterion.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `flight` satisfies both the text and the date criteria.
    #[must_use]
    pub fn matches(&self, flight: &Flight) -> bool {
        self.matches_query(flight) && self.matches_dates(flight)
    }

    fn matches_query(&self, flight: &Flight) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        [
            &flight.aircraft,
            &flight.departure_airport,
            &flight.arrival_airport,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_dates(&self, flight: &Flight) -> bool {
        let after_start = self.start_date.is_empty() || flight.date >= self.start_date;
        let before_end = self.end_date.is_empty() || flight.date <= self.end_date;
        after_start && before_end
    }
}

/// Return the flights in `flights` that satisfy `criteria`, in input order.
#[must_use]
pub fn filter_flights(flights: &[Flight], criteria: &FilterCriteria) -> Vec<Flight> {
    flights
        .iter()
        .filter(|flight| criteria.matches(flight))
        .cloned()
        .collect()
}

/// Convenience form taking the criteria as separate strings.
#[must_use]
pub fn filter(flights: &[Flight], query: &str, start_date: &str, end_date: &str) -> Vec<Flight> {
    filter_flights(flights, &FilterCriteria::new(query, start_date, end_date))
}
