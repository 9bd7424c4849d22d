//! Storage layer for flightlog.
//!
//! The whole flight collection is persisted as one unit in a named durable
//! slot. [`FlightSlot`] is the boundary the store depends on; [`SqliteSlot`]
//! keeps the slot in a `SQLite` database and [`MemorySlot`] keeps it in
//! process memory.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::Flight;

/// A single durable location holding the entire flight collection.
///
/// A slot that was never written loads as `Ok(None)`. Unreadable contents
/// are reported as errors; the store decides how to recover.
pub trait FlightSlot {
    /// The name the collection is stored under.
    fn key(&self) -> &str;

    /// Load the stored collection, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or its contents do not
    /// decode as a flight collection.
    fn load(&self) -> Result<Option<Vec<Flight>>>;

    /// Replace the stored collection with `flights`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    fn save(&mut self, flights: &[Flight]) -> Result<()>;
}

/// Decode a stored slot value. Blank values and JSON `null` mean "empty".
fn decode(raw: &str) -> Result<Option<Vec<Flight>>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str(raw)?)
}

/// `SQLite`-backed slot storage.
///
/// Each slot is one row in the `slots` table whose value is the JSON-encoded
/// collection. Saves replace the row inside a transaction.
#[derive(Debug)]
pub struct SqliteSlot {
    /// Path to the database file.
    path: PathBuf,
    /// Slot key.
    key: String,
    /// Database connection.
    conn: Connection,
}

impl SqliteSlot {
    /// Open or create the database at `path` and bind to slot `key`.
    ///
    /// Creates parent directories and the schema if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            key: key.into(),
            conn,
        })
    }

    /// Create an in-memory slot database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(key: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            key: key.into(),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the slot was last written, as stored by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn updated_at(&self) -> Result<Option<String>> {
        let updated = self
            .conn
            .query_row(
                "SELECT updated_at FROM slots WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated)
    }

    #[cfg(test)]
    fn write_raw(&self, raw: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![self.key, raw],
        )?;
        Ok(())
    }
}

impl FlightSlot for SqliteSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<Vec<Flight>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            debug!(key = %self.key, "Slot is empty");
            return Ok(None);
        };

        let flights = decode(&raw)?;
        debug!(
            key = %self.key,
            count = flights.as_ref().map_or(0, Vec::len),
            "Loaded slot"
        );
        Ok(flights)
    }

    fn save(&mut self, flights: &[Flight]) -> Result<()> {
        let raw = serde_json::to_string(flights)?;
        let updated_at = Utc::now().to_rfc3339();

        let key = &self.key;
        let write = |conn: &mut Connection| -> rusqlite::Result<()> {
            let tx = conn.transaction()?;
            tx.execute(
                r"
                INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                ",
                params![key, raw, updated_at],
            )?;
            tx.commit()
        };
        write(&mut self.conn).map_err(|e| Error::slot_save(key.as_str(), e.to_string()))?;

        debug!(key = %self.key, count = flights.len(), "Saved slot");
        Ok(())
    }
}

/// Slot kept in process memory as its encoded JSON text.
///
/// Nothing survives the process; useful for tests and throwaway sessions.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    key: String,
    raw: Option<String>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            raw: None,
        }
    }

    /// Create a slot that already holds `raw` as its stored text.
    #[must_use]
    pub fn with_raw(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            raw: Some(raw.into()),
        }
    }

    /// The stored text, if anything was saved.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl FlightSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<Option<Vec<Flight>>> {
        match &self.raw {
            Some(raw) => decode(raw),
            None => Ok(None),
        }
    }

    fn save(&mut self, flights: &[Flight]) -> Result<()> {
        self.raw = Some(serde_json::to_string(flights)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::NewFlight;

    fn create_test_slot() -> SqliteSlot {
        SqliteSlot::open_in_memory("flights").expect("failed to create test slot")
    }

    fn create_test_flight(id: i64, date: &str, aircraft: &str) -> Flight {
        NewFlight {
            date: date.to_string(),
            time: 60,
            aircraft: aircraft.to_string(),
            departure_airport: "RKSS".to_string(),
            arrival_airport: "RKPC".to_string(),
            weather: "VMC".to_string(),
            flight_type: "solo".to_string(),
            ..NewFlight::default()
        }
        .into_flight(id)
    }

    #[test]
    fn test_open_in_memory() {
        let slot = SqliteSlot::open_in_memory("flights");
        assert!(slot.is_ok());
    }

    #[test]
    fn test_missing_slot_loads_none() {
        let slot = create_test_slot();
        assert!(slot.load().unwrap().is_none());
        assert!(slot.updated_at().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut slot = create_test_slot();
        let flights = vec![
            create_test_flight(1, "2024-03-10", "C172"),
            create_test_flight(2, "2024-03-11", "PA-28"),
        ];

        slot.save(&flights).unwrap();
        let loaded = slot.load().unwrap().unwrap();

        assert_eq!(loaded, flights);
        assert!(slot.updated_at().unwrap().is_some());
    }

    #[test]
    fn test_save_replaces_previous_collection() {
        let mut slot = create_test_slot();
        slot.save(&[create_test_flight(1, "2024-03-10", "C172")])
            .unwrap();
        slot.save(&[]).unwrap();

        assert_eq!(slot.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_slots_are_isolated_by_key() {
        let mut slot = create_test_slot();
        slot.save(&[create_test_flight(1, "2024-03-10", "C172")])
            .unwrap();

        slot.key = "other".to_string();
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let slot = create_test_slot();
        slot.write_raw("{not json").unwrap();

        let err = slot.load().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_failed_write_reports_slot_save() {
        let mut slot = create_test_slot();
        slot.conn.execute_batch("DROP TABLE slots").unwrap();

        let err = slot
            .save(&[create_test_flight(1, "2024-03-10", "C172")])
            .unwrap_err();
        assert!(matches!(err, Error::SlotSave { ref key, .. } if key == "flights"));
    }

    #[test]
    fn test_blank_and_null_slot_load_none() {
        let slot = create_test_slot();
        slot.write_raw("").unwrap();
        assert!(slot.load().unwrap().is_none());

        slot.write_raw("null").unwrap();
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn test_open_file_database_persists() {
        let dir = std::env::temp_dir().join(format!("flightlog-storage-{}", std::process::id()));
        let path = dir.join("nested").join("flights.db");
        let flights = vec![create_test_flight(9, "2024-08-01", "DA40")];

        {
            let mut slot = SqliteSlot::open(&path, "flights").unwrap();
            assert_eq!(slot.path(), path.as_path());
            slot.save(&flights).unwrap();
        }

        let reopened = SqliteSlot::open(&path, "flights").unwrap();
        assert_eq!(reopened.load().unwrap(), Some(flights));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_memory_slot_round_trip() {
        let mut slot = MemorySlot::new("flights");
        assert!(slot.load().unwrap().is_none());

        let flights = vec![create_test_flight(3, "2024-01-02", "C152")];
        slot.save(&flights).unwrap();

        assert!(slot.raw().unwrap().contains("\"aircraft\":\"C152\""));
        assert_eq!(slot.load().unwrap(), Some(flights));
    }

    #[test]
    fn test_memory_slot_with_raw() {
        let slot = MemorySlot::with_raw("flights", "[]");
        assert_eq!(slot.key(), "flights");
        assert_eq!(slot.load().unwrap(), Some(Vec::new()));

        let broken = MemorySlot::with_raw("flights", "[{]");
        assert!(broken.load().is_err());
    }
}
