//! Event specifications as handed over by a calendar-file codec.
//!
//! An event carries a start, an end, an optional recurrence rule and a few
//! optional extras. Times may be bare dates (all-day events), floating local
//! times, or absolute instants with an offset.

use crate::dst::{localize, DstPolicy};
use crate::error::{Result, SlotError};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A start/end value as it appears in a calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    /// A date without time of day; resolves to local midnight.
    Date(NaiveDate),
    /// A local time with no zone; resolves in the event's zone.
    Floating(NaiveDateTime),
    /// An absolute instant.
    Fixed(DateTime<FixedOffset>),
}

impl EventTime {
    /// Resolve to an instant expressed in `tz`.
    ///
    /// Returns `None` when a local time falls in a DST gap and `policy` is
    /// [`DstPolicy::Skip`].
    pub fn resolve(&self, tz: Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
        match self {
            EventTime::Date(date) => localize(tz, date.and_time(NaiveTime::MIN), policy),
            EventTime::Floating(naive) => localize(tz, *naive, policy),
            EventTime::Fixed(dt) => Some(dt.with_timezone(&tz)),
        }
    }
}

const FLOATING_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

impl FromStr for EventTime {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(EventTime::Fixed(dt));
        }
        for format in FLOATING_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(EventTime::Floating(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(EventTime::Date)
            .map_err(|_| SlotError::InvalidEvent(format!("unrecognized date/time '{}'", s)))
    }
}

impl TryFrom<String> for EventTime {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EventTime> for String {
    fn from(value: EventTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            EventTime::Floating(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            EventTime::Fixed(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// One event record: start, end, optional recurrence rule and label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventSpec {
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    /// RFC 5545 RRULE value (e.g., "FREQ=WEEKLY;BYDAY=MO"), with or without
    /// the "RRULE:" prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    /// Recurrence instances to exclude (EXDATE).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exdates: Vec<EventTime>,
    /// IANA zone for this event's floating and date values. Falls back to the
    /// configured zone when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tzid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl EventSpec {
    /// A one-off event.
    pub fn new(start: EventTime, end: EventTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = Some(rrule.into());
        self
    }

    pub fn with_exdates(mut self, exdates: Vec<EventTime>) -> Self {
        self.exdates = exdates;
        self
    }

    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Display label used in diagnostics.
    pub fn label(&self) -> &str {
        self.summary.as_deref().unwrap_or("?")
    }

    /// The zone this event's local values are interpreted in.
    pub fn zone(&self, fallback: Tz) -> Result<Tz> {
        match self.tzid.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|_| SlotError::InvalidTimezone(name.to_string())),
            None => Ok(fallback),
        }
    }
}
