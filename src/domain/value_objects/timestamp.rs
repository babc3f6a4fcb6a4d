//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! Creation times of listings, notifications and reviews are carried as
//! [`Timestamp`] values so that ordering and serialization are uniform
//! across the crate.
//!
//! # Examples
//!
//! ```
//! use campus_market::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//!
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>`.
///
/// # Invariants
///
/// - Always in UTC timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds to the timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_market::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1000).unwrap();
    /// assert_eq!(ts.add_secs(60).timestamp_secs(), 1060);
    /// ```
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Subtracts seconds from the timestamp.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Formats the timestamp as ISO 8601.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(*ts.as_datetime() >= before);
        assert!(*ts.as_datetime() <= after);
    }

    #[test]
    fn from_secs_roundtrip() {
        let ts = Timestamp::from_secs(1704067200).unwrap();
        assert_eq!(ts.timestamp_secs(), 1704067200);
    }

    #[test]
    fn arithmetic() {
        let ts = Timestamp::from_secs(1000).unwrap();
        assert_eq!(ts.add_secs(60).timestamp_secs(), 1060);
        assert_eq!(ts.sub_secs(60).timestamp_secs(), 940);
    }

    #[test]
    fn ordering() {
        let ts1 = Timestamp::from_secs(1000).unwrap();
        let ts2 = Timestamp::from_secs(2000).unwrap();
        assert!(ts1.is_before(&ts2));
        assert!(ts2.is_after(&ts1));
        assert!(ts1 < ts2);
    }

    #[test]
    fn iso8601_format() {
        let ts = Timestamp::from_secs(1704067200).unwrap();
        let iso = ts.to_iso8601();
        assert!(iso.contains("2024-01-01"));
        assert!(iso.contains('T'));
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::from_millis(1704067200123).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}
