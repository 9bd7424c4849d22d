//! View state kept in sync with the flight store.
//!
//! [`FlightLog`] owns the [`FlightStore`], the active [`FilterCriteria`], the
//! filtered view derived from them, and the month shown by the calendar.
//! Every mutation and every criteria change recomputes the filtered view
//! from the full collection. Presentation layers drive it through the
//! methods below or by dispatching an [`Action`].

use tracing::{debug, info};

use crate::calendar::{render_month, CalendarGrid, CalendarMonth};
use crate::error::Result;
use crate::filter::{filter_flights, FilterCriteria};
use crate::flight::{Flight, FlightId, NewFlight};
use crate::stats::{summarize_top, Summary};
use crate::storage::FlightSlot;
use crate::store::FlightStore;

/// A yes/no gate asked before destructive changes.
pub trait Confirm {
    /// Return `true` to go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// What happened to a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The flight was deleted.
    Removed,
    /// No flight has that id; nothing changed.
    NotFound,
    /// The user declined; nothing changed.
    Declined,
}

/// A user request routed to the flight log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Log a new flight.
    Add(NewFlight),
    /// Delete a flight, after confirmation.
    Remove(FlightId),
    /// Replace the filter criteria.
    Filter(FilterCriteria),
    /// Drop all filter criteria.
    ClearFilters,
    /// Move the calendar by a number of months.
    ShiftMonth(i32),
    /// Show a specific calendar month.
    ShowMonth(CalendarMonth),
}

/// Result of a dispatched [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A flight was stored under this id.
    Added(FlightId),
    /// A delete request finished.
    Remove(RemoveOutcome),
    /// The filtered view now holds this many flights.
    Filtered(usize),
    /// The calendar now shows this month.
    MonthChanged(CalendarMonth),
}

/// Sort flights newest date first; flights on the same date keep their order.
#[must_use]
pub fn sorted_by_date_desc(flights: &[Flight]) -> Vec<&Flight> {
    let mut sorted: Vec<&Flight> = flights.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// The flight log: store plus the derived views.
#[derive(Debug)]
pub struct FlightLog<S: FlightSlot> {
    store: FlightStore<S>,
    criteria: FilterCriteria,
    filtered: Vec<Flight>,
    cursor: CalendarMonth,
}

impl<S: FlightSlot> FlightLog<S> {
    /// Wrap `store`, showing the current month and no filters.
    #[must_use]
    pub fn new(store: FlightStore<S>) -> Self {
        let filtered = store.list().to_vec();
        Self {
            store,
            criteria: FilterCriteria::default(),
            filtered,
            cursor: CalendarMonth::current(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &FlightStore<S> {
        &self.store
    }

    /// Every flight, unfiltered.
    #[must_use]
    pub fn flights(&self) -> &[Flight] {
        self.store.list()
    }

    /// Flights matching the active criteria, in insertion order.
    #[must_use]
    pub fn filtered(&self) -> &[Flight] {
        &self.filtered
    }

    /// The active filter criteria.
    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The month the calendar shows.
    #[must_use]
    pub fn cursor(&self) -> CalendarMonth {
        self.cursor
    }

    /// Log a new flight.
    pub fn add(&mut self, entry: NewFlight) -> FlightId {
        let id = self.store.add(entry);
        self.refresh();
        id
    }

    /// Delete flight `id` if it exists and `confirm` agrees.
    pub fn remove(&mut self, id: FlightId, confirm: &mut impl Confirm) -> RemoveOutcome {
        let Some(flight) = self.store.get(id) else {
            debug!(id, "Delete requested for unknown flight");
            return RemoveOutcome::NotFound;
        };

        let prompt = format!(
            "Delete the {} flight on {} ({})?",
            flight.aircraft,
            flight.date,
            flight.route()
        );
        if !confirm.confirm(&prompt) {
            info!(id, "Delete declined");
            return RemoveOutcome::Declined;
        }

        self.store.remove(id);
        self.refresh();
        RemoveOutcome::Removed
    }

    /// Replace the filter criteria and recompute the filtered view.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh();
    }

    /// Clear all criteria; the filtered view becomes the full collection.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.filtered = self.store.list().to_vec();
    }

    /// The filtered view, newest first.
    #[must_use]
    pub fn list_view(&self) -> Vec<&Flight> {
        sorted_by_date_desc(&self.filtered)
    }

    /// The calendar for the current cursor month, over all flights.
    ///
    /// # Errors
    ///
    /// Returns an error if the month's filler days cannot be represented.
    pub fn calendar(&self) -> Result<CalendarGrid> {
        render_month(self.cursor, self.store.list())
    }

    /// Totals over all flights.
    #[must_use]
    pub fn summary(&self, top_n: usize) -> Summary {
        summarize_top(self.store.list(), top_n)
    }

    /// Move the calendar `delta` months.
    ///
    /// # Errors
    ///
    /// Returns an error if the target month cannot be represented.
    pub fn shift_month(&mut self, delta: i32) -> Result<CalendarMonth> {
        self.cursor = self.cursor.shift(delta)?;
        Ok(self.cursor)
    }

    /// Show `month` in the calendar.
    pub fn show_month(&mut self, month: CalendarMonth) {
        self.cursor = month;
    }

    /// Retry a pending save.
    ///
    /// # Errors
    ///
    /// Returns the slot's error if saving fails.
    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }

    /// Route `action` to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns an error only when a calendar move goes out of range.
    pub fn dispatch(&mut self, action: Action, confirm: &mut impl Confirm) -> Result<Outcome> {
        let outcome = match action {
            Action::Add(entry) => Outcome::Added(self.add(entry)),
            Action::Remove(id) => Outcome::Remove(self.remove(id, confirm)),
            Action::Filter(criteria) => {
                self.apply_filter(criteria);
                Outcome::Filtered(self.filtered.len())
            }
            Action::ClearFilters => {
                self.clear_filters();
                Outcome::Filtered(self.filtered.len())
            }
            Action::ShiftMonth(delta) => Outcome::MonthChanged(self.shift_month(delta)?),
            Action::ShowMonth(month) => {
                self.show_month(month);
                Outcome::MonthChanged(month)
            }
        };
        debug!(?outcome, "Dispatched action");
        Ok(outcome)
    }

    fn refresh(&mut self) {
        self.filtered = filter_flights(self.store.list(), &self.criteria);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarCell;
    use crate::storage::MemorySlot;

    fn entry(date: &str, aircraft: &str, time: i64) -> NewFlight {
        NewFlight {
            date: date.to_string(),
            time,
            aircraft: aircraft.to_string(),
            departure_airport: "RKSS".to_string(),
            arrival_airport: "RKPC".to_string(),
            weather: "VMC".to_string(),
            flight_type: "solo".to_string(),
            ..NewFlight::default()
        }
    }

    fn create_test_log() -> FlightLog<MemorySlot> {
        FlightLog::new(FlightStore::open(MemorySlot::new("flights")))
    }

    fn ids(flights: &[Flight]) -> Vec<FlightId> {
        flights.iter().map(|f| f.id).collect()
    }

    #[test]
    fn test_new_log_shows_everything() {
        let mut slot = MemorySlot::new("flights");
        slot.save(&[entry("2024-03-10", "C172", 60).into_flight(1)])
            .unwrap();
        let log = FlightLog::new(FlightStore::open(slot));

        assert_eq!(log.filtered(), log.flights());
        assert!(log.criteria().is_empty());
    }

    #[test]
    fn test_add_recomputes_with_active_filter() {
        let mut log = create_test_log();
        log.apply_filter(FilterCriteria::new("cessna", "", ""));

        log.add(entry("2024-03-10", "Cessna 172", 60));
        log.add(entry("2024-03-11", "DA40", 60));

        assert_eq!(log.flights().len(), 2);
        assert_eq!(log.filtered().len(), 1);
        assert_eq!(log.filtered()[0].aircraft, "Cessna 172");
    }

    #[test]
    fn test_remove_requires_confirmation() {
        let mut log = create_test_log();
        let id = log.add(entry("2024-03-10", "C172", 60));

        let mut asked = Vec::new();
        let outcome = log.remove(id, &mut |prompt: &str| {
            asked.push(prompt.to_string());
            false
        });

        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(log.flights().len(), 1);
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("2024-03-10"));
        assert!(asked[0].contains("C172"));
    }

    #[test]
    fn test_remove_confirmed_updates_views() {
        let mut log = create_test_log();
        let keep = log.add(entry("2024-03-10", "C172", 60));
        let drop = log.add(entry("2024-03-11", "C172", 30));

        assert_eq!(log.remove(drop, &mut AssumeYes), RemoveOutcome::Removed);
        assert_eq!(ids(log.flights()), vec![keep]);
        assert_eq!(ids(log.filtered()), vec![keep]);
        assert_eq!(log.summary(3).total_minutes, 60);
    }

    #[test]
    fn test_remove_unknown_id_skips_prompt() {
        let mut log = create_test_log();
        log.add(entry("2024-03-10", "C172", 60));

        let mut prompted = false;
        let outcome = log.remove(999, &mut |_: &str| {
            prompted = true;
            true
        });

        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert!(!prompted);
        assert_eq!(log.flights().len(), 1);
    }

    #[test]
    fn test_clear_filters_is_idempotent() {
        let mut log = create_test_log();
        log.add(entry("2024-03-10", "C172", 60));
        log.add(entry("2024-04-10", "DA40", 60));
        log.apply_filter(FilterCriteria::new("da", "2024-04-01", ""));
        assert_eq!(log.filtered().len(), 1);

        log.clear_filters();
        let once = log.filtered().to_vec();
        log.clear_filters();

        assert_eq!(log.filtered(), once.as_slice());
        assert_eq!(log.filtered(), log.flights());
        assert!(log.criteria().is_empty());
    }

    #[test]
    fn test_list_view_is_newest_first() {
        let mut log = create_test_log();
        let a = log.add(entry("2024-03-10", "C172", 60));
        let b = log.add(entry("2024-05-01", "C172", 60));
        let c = log.add(entry("2024-03-10", "DA40", 60));
        let d = log.add(entry("2023-12-31", "C172", 60));

        let order: Vec<FlightId> = log.list_view().iter().map(|f| f.id).collect();
        assert_eq!(order, vec![b, a, c, d]);
    }

    #[test]
    fn test_calendar_ignores_filters() {
        let mut log = create_test_log();
        log.add(entry("2024-03-10", "C172", 60));
        log.add(entry("2024-03-10", "DA40", 30));
        log.apply_filter(FilterCriteria::new("zzz", "", ""));
        log.show_month(CalendarMonth::new(2024, 3).unwrap());

        assert!(log.filtered().is_empty());
        let grid = log.calendar().unwrap();
        assert!(grid.cells().contains(&CalendarCell::Day {
            day: 10,
            flights: 2,
            has_flights: true
        }));
        assert_eq!(log.summary(3).total_minutes, 90);
    }

    #[test]
    fn test_month_navigation_keeps_filters() {
        let mut log = create_test_log();
        log.add(entry("2024-03-10", "C172", 60));
        log.apply_filter(FilterCriteria::new("c1", "", ""));
        log.show_month(CalendarMonth::new(2024, 1).unwrap());

        let month = log.shift_month(-1).unwrap();
        assert_eq!((month.year(), month.month()), (2023, 12));
        assert_eq!(log.criteria().query, "c1");
        assert_eq!(log.filtered().len(), 1);
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let mut log = create_test_log();

        let Outcome::Added(id) = log
            .dispatch(Action::Add(entry("2024-03-10", "C172", 60)), &mut AssumeYes)
            .unwrap()
        else {
            panic!("expected Added");
        };

        let outcome = log
            .dispatch(
                Action::Filter(FilterCriteria::new("pa-28", "", "")),
                &mut AssumeYes,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Filtered(0));

        let outcome = log.dispatch(Action::ClearFilters, &mut AssumeYes).unwrap();
        assert_eq!(outcome, Outcome::Filtered(1));

        let march = CalendarMonth::new(2024, 3).unwrap();
        log.dispatch(Action::ShowMonth(march), &mut AssumeYes)
            .unwrap();
        let outcome = log.dispatch(Action::ShiftMonth(2), &mut AssumeYes).unwrap();
        assert_eq!(
            outcome,
            Outcome::MonthChanged(CalendarMonth::new(2024, 5).unwrap())
        );

        let outcome = log.dispatch(Action::Remove(id), &mut AssumeYes).unwrap();
        assert_eq!(outcome, Outcome::Remove(RemoveOutcome::Removed));
        assert!(log.flights().is_empty());
    }

    #[test]
    fn test_sorted_by_date_desc_is_stable() {
        let flights = vec![
            entry("2024-01-01", "A", 1).into_flight(1),
            entry("2024-01-02", "B", 1).into_flight(2),
            entry("2024-01-01", "C", 1).into_flight(3),
        ];
        let order: Vec<FlightId> = sorted_by_date_desc(&flights).iter().map(|f| f.id).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }
}
