//! Working-day calendar: daily working-hour blocks and business-day arithmetic.
//!
//! Business days are Monday through Friday. There is no holiday calendar.

use crate::config::Config;
use crate::dst::{localize, DstPolicy};
use crate::interval::Interval;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

/// Monday–Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Yield one working-hour block per business day in `[first, last]`.
///
/// Each block spans `work_start..work_end` local time in the configured zone.
/// Weekends produce nothing. A day whose block cannot be placed on the clock
/// (DST gap under [`DstPolicy::Skip`]) is skipped.
pub fn working_blocks(
    first: NaiveDate,
    last: NaiveDate,
    config: &Config,
) -> impl Iterator<Item = Interval> + '_ {
    first
        .iter_days()
        .take_while(move |day| *day <= last)
        .filter(|day| is_business_day(*day))
        .filter_map(move |day| {
            let tz = config.timezone();
            let policy = config.dst_policy();
            let start = localize(tz, day.and_time(config.work_start()), policy)?;
            let end = localize(tz, day.and_time(config.work_end()), policy)?;
            Interval::new(start, end).ok()
        })
}

/// The calendar date `n` business days after `date`.
///
/// Walks forward one day at a time, counting only Monday–Friday; `date` itself
/// is never counted. With `n = 3`: Tuesday → Friday, Saturday → Wednesday,
/// Sunday → Wednesday. `n = 0` returns `date` unchanged, whatever its weekday.
///
/// Returns `None` if the walk runs past the last representable date.
pub fn business_day_after(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    let mut current = date;
    let mut added = 0;
    while added < n {
        current = current.checked_add_days(Days::new(1))?;
        if is_business_day(current) {
            added += 1;
        }
    }
    Some(current)
}

/// Start of the day `n` business days after `reference`, in the reference's zone.
///
/// Midnight falling in a DST gap is shifted forward to the first valid instant
/// of that day. `None` when the target date is out of range.
pub fn advance_business_days(reference: DateTime<Tz>, n: u32) -> Option<DateTime<Tz>> {
    let tz = reference.timezone();
    let date = business_day_after(reference.date_naive(), n)?;
    Some(start_of_day(tz, date))
}

/// First instant of `date` in `tz`.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    localize(tz, midnight, DstPolicy::ShiftForward)
        .unwrap_or_else(|| midnight.and_utc().with_timezone(&tz))
}
