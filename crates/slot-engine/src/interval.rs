//! Time intervals and the linear merge of sorted interval lists.
//!
//! An [`Interval`] is either a busy period or an available slot. Intervals are
//! half-open in spirit: two intervals where one ends exactly when the other
//! starts do not overlap, but they do merge.

use crate::error::{Result, SlotError};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An ordered `(start, end)` pair of zoned timestamps with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl Interval {
    /// Build an interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Widen the interval by `buffer` on both sides.
    ///
    /// A zero or negative buffer returns the interval unchanged.
    pub fn padded(&self, buffer: Duration) -> Self {
        if buffer <= Duration::zero() {
            return *self;
        }
        Self {
            start: self.start - buffer,
            end: self.end + buffer,
        }
    }

    /// True when the two intervals share time. Touching intervals
    /// (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Express both endpoints in another zone. The instants are unchanged.
    pub fn with_timezone(&self, tz: Tz) -> Self {
        Self {
            start: self.start.with_timezone(&tz),
            end: self.end.with_timezone(&tz),
        }
    }
}

/// Serialized form: RFC 3339 strings, with the IANA zone kept alongside so a
/// roundtrip restores the same zone.
#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: String,
    end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timezone: Option<String>,
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        RawInterval {
            start: interval.start.to_rfc3339(),
            end: interval.end.to_rfc3339(),
            timezone: Some(interval.start.timezone().name().to_string()),
        }
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = SlotError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        let tz: Tz = match raw.timezone.as_deref() {
            Some(name) => name
                .parse()
                .map_err(|_| SlotError::InvalidTimezone(name.to_string()))?,
            None => Tz::UTC,
        };
        let parse = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&tz))
                .map_err(|e| SlotError::InvalidEvent(format!("bad timestamp '{}': {}", s, e)))
        };
        Interval::new(parse(&raw.start)?, parse(&raw.end)?)
    }
}

/// Merge a list of intervals sorted ascending by start.
///
/// Overlapping or exactly touching intervals (`next.start <= current.end`)
/// are fused into one; strictly separated ones stay distinct. The output is
/// sorted, and every gap between consecutive outputs is strictly positive.
pub fn merge_intervals(sorted: &[Interval]) -> Vec<Interval> {
    debug_assert!(
        sorted.windows(2).all(|w| w[0].start <= w[1].start),
        "merge_intervals expects input sorted by start"
    );

    sorted.iter().fold(Vec::with_capacity(sorted.len()), |mut merged, next| {
        match merged.last_mut() {
            Some(last) if next.start <= last.end => {
                // Overlapping or touching: extend the current interval.
                last.end = last.end.max(next.end);
            }
            _ => merged.push(*next),
        }
        merged
    })
}

/// Sort intervals ascending by start (ties broken by end).
pub fn sort_intervals(intervals: &mut [Interval]) {
    intervals.sort_by_key(|iv| (iv.start, iv.end));
}
