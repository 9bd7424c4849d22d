//! Core flight record types for flightlog.
//!
//! A [`Flight`] is one logged flight. Records are created from a [`NewFlight`]
//! by the store, which assigns the id.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a flight record, unique within a store.
pub type FlightId = i64;

/// A single logged flight.
///
/// Dates are kept as ISO `YYYY-MM-DD` strings; filtering and calendar
/// grouping compare them lexically. Fields are serialized in camelCase.
/// Decoding is forgiving: `null` text reads as empty and an unusable
/// `time` reads as 0, so one odd record never hides the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Unique identifier (assigned by the store).
    pub id: FlightId,

    /// Flight date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,

    /// Flight duration in minutes.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub time: i64,

    /// Aircraft type or registration.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aircraft: String,

    /// Departure airport code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub departure_airport: String,

    /// Arrival airport code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arrival_airport: String,

    /// Weather conditions.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: String,

    /// Instructor name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,

    /// Kind of flight (solo, dual, cross-country, ...).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flight_type: String,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Flight {
    /// The instructor, unless absent or blank.
    #[must_use]
    pub fn visible_instructor(&self) -> Option<&str> {
        non_blank(self.instructor.as_deref())
    }

    /// The notes, unless absent or blank.
    #[must_use]
    pub fn visible_notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }

    /// Route as `DEP → ARR`.
    #[must_use]
    pub fn route(&self) -> String {
        format!("{} → {}", self.departure_airport, self.arrival_airport)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts integers, fractional numbers, numeric strings and `null`
/// (a blank duration field is saved as `null`).
fn lenient_minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let minutes = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(whole_minutes)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(whole_minutes))
        }
        _ => None,
    };
    Ok(minutes.unwrap_or(0))
}

#[allow(clippy::cast_possible_truncation)]
fn whole_minutes(value: f64) -> i64 {
    // `as` saturates and maps NaN to 0
    value.trunc() as i64
}

/// A flight as entered by the user, before the store assigns an id.
///
/// Nothing here is validated; the store accepts whatever it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    /// Flight date, `YYYY-MM-DD`.
    pub date: String,
    /// Flight duration in minutes.
    pub time: i64,
    /// Aircraft type or registration.
    pub aircraft: String,
    /// Departure airport code.
    pub departure_airport: String,
    /// Arrival airport code.
    pub arrival_airport: String,
    /// Weather conditions.
    pub weather: String,
    /// Instructor name, if any.
    pub instructor: Option<String>,
    /// Kind of flight.
    pub flight_type: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl NewFlight {
    /// Turn this entry into a stored record with the given id.
    #[must_use]
    pub fn into_flight(self, id: FlightId) -> Flight {
        Flight {
            id,
            date: self.date,
            time: self.time,
            aircraft: self.aircraft,
            departure_airport: self.departure_airport,
            arrival_airport: self.arrival_airport,
            weather: self.weather,
            instructor: self.instructor,
            flight_type: self.flight_type,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewFlight {
        NewFlight {
            date: "2024-03-10".to_string(),
            time: 90,
            aircraft: "C172".to_string(),
            departure_airport: "RKSS".to_string(),
            arrival_airport: "RKPC".to_string(),
            weather: "VMC".to_string(),
            instructor: Some("Kim".to_string()),
            flight_type: "dual".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_into_flight_keeps_fields() {
        let flight = sample().into_flight(42);
        assert_eq!(flight.id, 42);
        assert_eq!(flight.date, "2024-03-10");
        assert_eq!(flight.time, 90);
        assert_eq!(flight.aircraft, "C172");
        assert_eq!(flight.route(), "RKSS → RKPC");
    }

    #[test]
    fn test_visible_optional_fields() {
        let mut flight = sample().into_flight(1);
        assert_eq!(flight.visible_instructor(), Some("Kim"));
        assert_eq!(flight.visible_notes(), None);

        flight.instructor = Some(String::new());
        flight.notes = Some("   ".to_string());
        assert_eq!(flight.visible_instructor(), None);
        assert_eq!(flight.visible_notes(), None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_string(&sample().into_flight(7)).unwrap();
        assert!(json.contains("\"departureAirport\":\"RKSS\""));
        assert!(json.contains("\"arrivalAirport\":\"RKPC\""));
        assert!(json.contains("\"flightType\":\"dual\""));
        assert!(!json.contains("notes"));
    }

    #[test]
    fn test_deserializes_browser_record() {
        // Empty optional fields and a missing notes key are accepted as-is
        let json = r#"{
            "id": 1710000000000,
            "date": "2024-03-10",
            "time": 60,
            "aircraft": "PA-28",
            "departureAirport": "KPAO",
            "arrivalAirport": "KSQL",
            "weather": "clear",
            "instructor": "",
            "flightType": "solo"
        }"#;
        let flight: Flight = serde_json::from_str(json).unwrap();
        assert_eq!(flight.id, 1_710_000_000_000);
        assert_eq!(flight.instructor.as_deref(), Some(""));
        assert_eq!(flight.visible_instructor(), None);
        assert!(flight.notes.is_none());
    }

    #[test]
    fn test_time_decodes_leniently() {
        let decode = |time: &str| {
            let json = format!(r#"{{"id": 1, "date": "2024-03-10", "time": {time}}}"#);
            serde_json::from_str::<Flight>(&json).unwrap().time
        };

        assert_eq!(decode("null"), 0);
        assert_eq!(decode("\"90\""), 90);
        assert_eq!(decode("\"abc\""), 0);
        assert_eq!(decode("45.7"), 45);
        assert_eq!(decode("true"), 0);
    }

    #[test]
    fn test_null_text_fields_read_as_empty() {
        let json = r#"{"id": 2, "date": null, "aircraft": null, "time": 30, "instructor": null}"#;
        let flight: Flight = serde_json::from_str(json).unwrap();
        assert_eq!(flight.date, "");
        assert_eq!(flight.aircraft, "");
        assert!(flight.instructor.is_none());
        assert_eq!(flight.time, 30);
    }
}
