//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` is the single time type of the wizard: transition log
//! entries, submission metadata and receipts all carry it. It is always UTC
//! and truncated to whole milliseconds, rendered as
//! `YYYY-MM-DDTHH:MM:SS.mmmZ`.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC-only timestamp, truncated to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`, discarding anything below a
    /// millisecond.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
        Self(dt.with_nanosecond(millis).unwrap_or(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] for malformed input or a
    /// non-`Z` offset.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if !s.ends_with('Z') {
            return Err(ValidationError::InvalidTimestamp(format!(
                "must use Z suffix (UTC only), got {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ValidationError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Unix epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// ISO 8601 with milliseconds and Z suffix, e.g.
    /// `2026-01-15T12:00:00.000Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_whole_milliseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn from_utc_keeps_milliseconds() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-10-19T08:30:45.123Z");
        assert_eq!(ts.epoch_millis() % 1000, 123);
    }

    #[test]
    fn parse_accepts_z_only() {
        assert!(Timestamp::parse("2026-10-19T08:30:45Z").is_ok());
        assert!(Timestamp::parse("2026-10-19T08:30:45+00:00").is_err());
        assert!(Timestamp::parse("2026-10-19T14:00:45+05:30").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn display_matches_iso8601() {
        let ts = Timestamp::parse("2026-10-19T08:30:45.250Z").unwrap();
        assert_eq!(format!("{ts}"), "2026-10-19T08:30:45.250Z");
        let whole = Timestamp::parse("2026-10-19T08:30:45Z").unwrap();
        assert_eq!(whole.to_iso8601(), "2026-10-19T08:30:45.000Z");
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::parse("2026-10-19T08:30:45Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
