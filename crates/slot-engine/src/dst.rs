//! DST transition policies for wall-clock times.
//!
//! Working hours, start-of-day boundaries and floating event times are all
//! given as local wall-clock values. Around a DST transition such a value can
//! map to zero instants (spring-forward gap) or two (fall-back overlap).

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// Policy for wall-clock times that fall inside a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Drop the value (e.g., no working block that day).
    Skip,
    /// Interpret the time with the UTC offset in force before the gap, which
    /// moves it forward by the gap length (02:30 becomes 03:30). This is the
    /// RFC 5545 rule for nonexistent local times.
    #[default]
    ShiftForward,
}

/// Resolve a local wall-clock time in `tz` to an instant.
///
/// Ambiguous times (fall-back overlap) resolve to the earlier instant.
/// Nonexistent times follow `policy`.
pub fn localize(tz: Tz, naive: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                let offset_before = tz
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(offset_before.local_minus_utc()));
                Some(tz.from_utc_datetime(&utc))
            }
        },
    }
}
