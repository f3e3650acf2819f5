//! Appointment time ranges in local wall-clock time.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Wire format for timestamps: local ISO, seconds precision.
pub const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SECONDS_PER_HOUR: i64 = 3600;

/// A start/end pair with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "local_iso")]
    start: NaiveDateTime,
    #[serde(with = "local_iso")]
    end: NaiveDateTime,
}

impl TimeRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> ScheduleResult<Self> {
        if end < start {
            return Err(ScheduleError::InvalidTimeRange { start, end });
        }
        Ok(TimeRange { start, end })
    }

    /// Zero-length range at `start`.
    pub fn instant(start: NaiveDateTime) -> Self {
        TimeRange { start, end: start }
    }

    /// A missing end collapses to the start.
    pub fn with_optional_end(
        start: NaiveDateTime,
        end: Option<NaiveDateTime>,
    ) -> ScheduleResult<Self> {
        Self::new(start, end.unwrap_or(start))
    }

    /// `end = start + hours`, rounded to the second. A negative duration, or
    /// one whose end the calendar cannot represent, is invalid.
    pub fn from_duration_hours(start: NaiveDateTime, hours: f64) -> ScheduleResult<Self> {
        let invalid = || ScheduleError::invalid_field("duration", hours.to_string());
        if !hours.is_finite() || hours < 0.0 {
            return Err(invalid());
        }
        let seconds = (hours * SECONDS_PER_HOUR as f64).round();
        if seconds >= i64::MAX as f64 {
            return Err(invalid());
        }
        let end = Duration::try_seconds(seconds as i64)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(invalid)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / SECONDS_PER_HOUR as f64
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Same length, new start (what a calendar drop does).
    pub fn shifted_to(&self, start: NaiveDateTime) -> Self {
        TimeRange {
            start,
            end: start + self.duration(),
        }
    }

    /// Duration as the form's `duration` field: whole hours when exact,
    /// decimal hours otherwise.
    pub fn format_duration_hours(&self) -> String {
        let seconds = self.duration().num_seconds();
        if seconds % SECONDS_PER_HOUR == 0 {
            (seconds / SECONDS_PER_HOUR).to_string()
        } else {
            self.duration_hours().to_string()
        }
    }
}

pub fn format_local_iso(dt: &NaiveDateTime) -> String {
    dt.format(LOCAL_ISO_FORMAT).to_string()
}

/// Parse the timestamp shapes a calendar surface and backend produce.
///
/// Accepts full local ISO (optionally with fractional seconds), minute
/// precision, a space separator, RFC 3339 with an offset (the wall-clock part
/// is kept), and a bare date (midnight).
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde adapter for `NaiveDateTime` in local ISO form.
pub mod local_iso {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_local_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_local_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// Serde adapter for `Option<NaiveDateTime>`; null and empty map to `None`.
pub mod local_iso_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        dt: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_str(&super::format_local_iso(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_local_datetime(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
        }
    }
}
