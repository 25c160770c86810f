//! Common serde helpers for reservation slot values
//!
//! Times travel as `"HH:MM"` on the wire; `"HH:MM:SS"` is accepted on input.
//! Slots have minute precision, so parsed times drop seconds.

use chrono::{NaiveDate, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse `HH:MM` (or `HH:MM:SS`) into a time of day, truncated to the minute
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    let time = NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, TIME_FORMAT_SECONDS))
        .ok()?;
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)
}

/// `#[serde(with = "serde_helpers::hhmm")]` for `NaiveTime` fields
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(super::TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time (expected HH:MM): {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Slot {
        #[serde(with = "hhmm")]
        time: NaiveTime,
    }

    #[test]
    fn time_is_written_without_seconds() {
        let slot = Slot {
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        };
        assert_eq!(serde_json::to_string(&slot).unwrap(), r#"{"time":"19:00"}"#);
    }

    #[test]
    fn time_accepts_seconds_on_input() {
        let slot: Slot = serde_json::from_str(r#"{"time":"07:30:00"}"#).unwrap();
        assert_eq!(slot.time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert!(serde_json::from_str::<Slot>(r#"{"time":"7pm"}"#).is_err());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(
            parse_date("2024-06-01"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert!(parse_date("").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert!(parse_date("01/06/2024").is_none());
    }

    #[test]
    fn parse_time_drops_seconds() {
        assert_eq!(parse_time("19:00:30"), parse_time("19:00"));
        assert_eq!(
            parse_time("07:45:59"),
            NaiveTime::from_hms_opt(7, 45, 0)
        );
    }

    #[test]
    fn parse_time_bounds() {
        assert!(parse_time("23:59").is_some());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("").is_none());
    }
}
