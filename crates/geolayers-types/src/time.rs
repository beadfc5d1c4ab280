//! Time window presets and ISO 8601 helpers used by query filters.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relative time window resolved against "now" at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimePreset {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl TimePreset {
    pub fn duration(&self) -> Duration {
        match self {
            TimePreset::LastHour => Duration::hours(1),
            TimePreset::LastDay => Duration::hours(24),
            TimePreset::LastWeek => Duration::days(7),
            TimePreset::LastMonth => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePreset::LastHour => "1h",
            TimePreset::LastDay => "24h",
            TimePreset::LastWeek => "7d",
            TimePreset::LastMonth => "30d",
        }
    }

    /// The window of this preset's length ending at `now`.
    pub fn window_ending(&self, now: DateTime<Utc>) -> TimeRange {
        TimeRange::new(now - self.duration(), now)
    }

    /// The window of this preset's length ending at the current wall clock.
    pub fn window(&self) -> TimeRange {
        self.window_ending(Utc::now())
    }
}

impl fmt::Display for TimePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePreset {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(TimePreset::LastHour),
            "24h" => Ok(TimePreset::LastDay),
            "7d" => Ok(TimePreset::LastWeek),
            "30d" => Ok(TimePreset::LastMonth),
            other => Err(TimeParseError::UnknownPreset(other.to_string())),
        }
    }
}

/// A time range for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Start formatted for the wire.
    pub fn start_iso(&self) -> String {
        format_iso8601(&self.start)
    }

    /// End formatted for the wire.
    pub fn end_iso(&self) -> String {
        format_iso8601(&self.end)
    }
}

/// Format as ISO 8601 with millisecond precision and a `Z` suffix,
/// e.g. `2024-01-15T12:00:00.000Z`.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO 8601 timestamp. Accepts RFC 3339, a naive datetime
/// (assumed UTC) or a bare date (midnight UTC).
pub fn parse_iso8601(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Some(ndt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Unknown time preset: {0}. Expected one of 1h, 24h, 7d, 30d")]
    UnknownPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_preset_windows_have_exact_length() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        for (preset, hours) in [
            (TimePreset::LastHour, 1),
            (TimePreset::LastDay, 24),
            (TimePreset::LastWeek, 24 * 7),
            (TimePreset::LastMonth, 24 * 30),
        ] {
            let window = preset.window_ending(now);
            assert_eq!(window.end, now);
            assert_eq!(window.duration(), Duration::hours(hours));
        }
    }

    #[test]
    fn test_preset_parse_and_display() {
        for token in ["1h", "24h", "7d", "30d"] {
            let preset: TimePreset = token.parse().unwrap();
            assert_eq!(preset.to_string(), token);
        }
        assert_eq!(
            "2w".parse::<TimePreset>(),
            Err(TimeParseError::UnknownPreset("2w".to_string()))
        );
        assert_eq!(TimePreset::default(), TimePreset::LastDay);
    }

    #[test]
    fn test_format_iso8601_millis_z() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_iso8601(&dt), "2024-01-15T12:00:00.000Z");
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let dt = parse_iso8601("2024-01-15T12:30:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 1, 15, 12));

        let naive = parse_iso8601("2024-01-15T12:30:00").unwrap();
        assert_eq!(naive, dt);

        let date = parse_iso8601("2024-01-31").unwrap();
        assert_eq!(date.hour(), 0);

        assert!(parse_iso8601("yesterday").is_err());
    }

    #[test]
    fn test_range_contains() {
        let range = TimePreset::LastHour.window();
        assert!(range.contains(&(range.start + Duration::minutes(30))));
        assert!(!range.contains(&(range.end + Duration::seconds(1))));
    }
}
