use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Server-assigned ordering value, UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed RFC 3339 timestamp {raw:?}: {source}")]
pub struct TimestampError {
    raw: String,
    source: chrono::ParseError,
}

impl Timestamp {
    /// Out-of-range inputs clamp to the Unix epoch.
    pub fn from_secs(seconds: i64) -> Self {
        Self(DateTime::from_timestamp(seconds, 0).unwrap_or_default())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    pub fn seconds(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// Parse the `timestampValue` form used by Firestore's REST surface. Any
    /// offset is normalised to UTC.
    pub fn parse_rfc3339(s: &str) -> Result<Self, TimestampError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|source| TimestampError {
                raw: s.to_string(),
                source,
            })
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_rfc3339(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_epoch_and_fractions() {
        assert_eq!(
            Timestamp::parse_rfc3339("1970-01-01T00:00:00Z"),
            Ok(Timestamp::from_secs(0))
        );
        let t = Timestamp::parse_rfc3339("2024-03-01T12:30:05.123456Z").unwrap();
        assert_eq!(t.seconds(), 1_709_296_205);
        assert_eq!(t.subsec_nanos(), 123_456_000);
    }

    #[test]
    fn applies_offsets() {
        let utc = Timestamp::parse_rfc3339("2024-03-01T12:00:00Z").unwrap();
        let plus = Timestamp::parse_rfc3339("2024-03-01T14:00:00+02:00").unwrap();
        assert_eq!(utc, plus);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timestamp::parse_rfc3339("yesterday").is_err());
        assert!(Timestamp::parse_rfc3339("2024-02-30T00:00:00Z").is_err());
        assert!(Timestamp::parse_rfc3339("2024-01-01T00:00:00.Z").is_err());
    }

    #[test]
    fn millis_keep_sub_second_order() {
        let a = Timestamp::from_millis(1_000);
        let b = Timestamp::from_millis(1_001);
        assert!(a < b);
        assert_eq!(b.subsec_nanos(), 1_000_000);
    }

    #[test]
    fn display_is_parseable() {
        let t = Timestamp::parse_rfc3339("2024-03-01T12:30:05.000000005Z").unwrap();
        assert_eq!(t.to_string(), "2024-03-01T12:30:05.000000005Z");
        assert_eq!(t.to_string().parse::<Timestamp>(), Ok(t));
    }
}
