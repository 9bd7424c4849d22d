//! The authoritative flight collection.
//!
//! [`FlightStore`] owns every flight in memory and writes the whole
//! collection back to its [`FlightSlot`] after each mutation. Saving is
//! best-effort: a failed write is logged and retried on the next mutation
//! or on [`FlightStore::flush`].

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::flight::{Flight, FlightId, NewFlight};
use crate::storage::FlightSlot;

/// In-memory flight collection backed by a durable slot.
#[derive(Debug)]
pub struct FlightStore<S: FlightSlot> {
    slot: S,
    flights: Vec<Flight>,
    /// Set when the last save failed.
    dirty: bool,
}

impl<S: FlightSlot> FlightStore<S> {
    /// Load the collection from `slot`.
    ///
    /// An empty slot, or one that cannot be read, starts an empty collection.
    #[must_use]
    pub fn open(slot: S) -> Self {
        let flights = match slot.load() {
            Ok(Some(flights)) => {
                info!(key = slot.key(), count = flights.len(), "Loaded flights");
                flights
            }
            Ok(None) => {
                debug!(key = slot.key(), "No stored flights, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = slot.key(), error = %e, "Could not load flights, starting empty");
                Vec::new()
            }
        };

        Self {
            slot,
            flights,
            dirty: false,
        }
    }

    /// Store a new flight and return its id.
    pub fn add(&mut self, entry: NewFlight) -> FlightId {
        let id = self.next_id();
        self.flights.push(entry.into_flight(id));
        info!(id, "Added flight");
        self.persist();
        id
    }

    /// Delete the flight with `id`.
    ///
    /// Returns `false` if no such flight exists. The collection is saved
    /// either way.
    pub fn remove(&mut self, id: FlightId) -> bool {
        let before = self.flights.len();
        self.flights.retain(|flight| flight.id != id);
        let removed = self.flights.len() < before;

        if removed {
            info!(id, "Removed flight");
        } else {
            debug!(id, "No flight to remove");
        }
        self.persist();
        removed
    }

    /// All flights, in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Flight] {
        &self.flights
    }

    /// Look up a flight by id.
    #[must_use]
    pub fn get(&self, id: FlightId) -> Option<&Flight> {
        self.flights.iter().find(|flight| flight.id == id)
    }

    /// Number of stored flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether the store holds no flights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Whether the in-memory collection is ahead of the slot.
    #[must_use]
    pub fn has_pending_save(&self) -> bool {
        self.dirty
    }

    /// Retry a save that previously failed.
    ///
    /// # Errors
    ///
    /// Returns the slot's error if the save fails again.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.slot.save(&self.flights)?;
            self.dirty = false;
        }
        Ok(())
    }

    /// The backing slot.
    #[must_use]
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Wall-clock milliseconds, bumped past every id already in use.
    ///
    /// When the largest id is `FlightId::MAX`, the first free id at or
    /// after the clock reading is used instead.
    fn next_id(&self) -> FlightId {
        let now = Utc::now().timestamp_millis();
        match self.flights.iter().map(|flight| flight.id).max() {
            Some(max) if max >= now => max
                .checked_add(1)
                .unwrap_or_else(|| self.free_id_from(now)),
            _ => now,
        }
    }

    fn free_id_from(&self, start: FlightId) -> FlightId {
        let used: HashSet<FlightId> = self.flights.iter().map(|flight| flight.id).collect();
        let mut id = start;
        while used.contains(&id) {
            id = id.wrapping_add(1);
        }
        debug!(id, "Id range exhausted above the clock, reusing a free id");
        id
    }

    fn persist(&mut self) {
        match self.slot.save(&self.flights) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!(
                    key = self.slot.key(),
                    error = %e,
                    "Failed to save flights, will retry on next change"
                );
                self.dirty = true;
            }
        }
    }
}
