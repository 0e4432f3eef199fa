//! # Temporal Types — UTC-Only Timestamps
//!
//! Lifecycle transitions and snapshots are stamped with a UTC instant
//! truncated to whole seconds, rendered as `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a `DateTime<Utc>`, dropping sub-second precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar year of this instant, used for default harvest years.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// ISO 8601 with a `Z` suffix and no fractional seconds.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
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
    fn truncates_sub_seconds() {
        let dt = Utc
            .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
            .unwrap()
            .with_nanosecond(589_793_238)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2025-03-14T09:26:53Z");
        assert_eq!(ts.year(), 2025);
    }

    #[test]
    fn now_has_no_fraction() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }
}
