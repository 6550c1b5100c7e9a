//! Tests for working-hour blocks and business-day arithmetic.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Weekday};
use chrono_tz::Europe::Paris;
use chrono_tz::Tz;
use slot_engine::dst::DstPolicy;
use slot_engine::workdays::{business_day_after, is_business_day, start_of_day};
use slot_engine::{advance_business_days, working_blocks, Config};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn paris(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    Paris.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ---------------------------------------------------------------------------
// advance_business_days
// ---------------------------------------------------------------------------

#[test]
fn three_days_from_tuesday_is_friday() {
    // Tue 2026-03-03 15:42 → Fri 2026-03-06 00:00
    let result = advance_business_days(paris(2026, 3, 3, 15, 42), 3).unwrap();
    assert_eq!(result, paris(2026, 3, 6, 0, 0));
}

#[test]
fn three_days_from_thursday_crosses_weekend() {
    let result = advance_business_days(paris(2026, 3, 5, 9, 0), 3).unwrap();
    assert_eq!(result, paris(2026, 3, 10, 0, 0));
    assert_eq!(result.weekday(), Weekday::Tue);
}

#[test]
fn three_days_from_saturday_and_sunday_both_land_on_wednesday() {
    let from_sat = advance_business_days(paris(2026, 3, 7, 11, 0), 3).unwrap();
    let from_sun = advance_business_days(paris(2026, 3, 8, 11, 0), 3).unwrap();
    assert_eq!(from_sat, paris(2026, 3, 11, 0, 0));
    assert_eq!(from_sun, from_sat);
    assert_eq!(from_sat.weekday(), Weekday::Wed);
}

#[test]
fn zero_days_returns_start_of_same_day() {
    // Even on a weekend: no business days are added.
    let result = advance_business_days(paris(2026, 3, 7, 11, 0), 0).unwrap();
    assert_eq!(result, paris(2026, 3, 7, 0, 0));
}

#[test]
fn result_is_always_a_weekday() {
    let mut day = date(2026, 3, 1);
    for _ in 0..14 {
        for n in 1..=10 {
            let landed = business_day_after(day, n).unwrap();
            assert!(is_business_day(landed), "{} + {}", day, n);
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn advancing_past_the_calendar_end_is_none() {
    let last = chrono_tz::UTC.from_utc_datetime(&NaiveDate::MAX.and_time(NaiveTime::MIN));
    assert!(advance_business_days(last, 1).is_none());
}

#[test]
fn start_of_day_stays_in_reference_zone() {
    let tokyo = chrono_tz::Asia::Tokyo
        .with_ymd_and_hms(2026, 3, 3, 23, 30, 0)
        .unwrap();
    let result = advance_business_days(tokyo, 1).unwrap();
    assert_eq!(result.timezone(), chrono_tz::Asia::Tokyo);
    assert_eq!((result.day(), result.hour()), (4, 0));
}

#[test]
fn start_of_day_when_midnight_is_skipped() {
    // Santiago springs forward at local midnight (2026-09-06 00:00 → 01:00).
    let tz = chrono_tz::America::Santiago;
    let result = start_of_day(tz, date(2026, 9, 6));
    assert_eq!(result.date_naive(), date(2026, 9, 6));
    assert_eq!(result.hour(), 1);
}

// ---------------------------------------------------------------------------
// working_blocks
// ---------------------------------------------------------------------------

#[test]
fn one_block_per_weekday() {
    let config = Config::default();
    // Mon 2026-03-02 .. Sun 2026-03-15
    let blocks: Vec<_> = working_blocks(date(2026, 3, 2), date(2026, 3, 15), &config).collect();

    assert_eq!(blocks.len(), 10);
    assert_eq!(blocks[0].start(), paris(2026, 3, 2, 13, 30));
    assert_eq!(blocks[0].end(), paris(2026, 3, 2, 17, 0));
    assert_eq!(blocks[9].start(), paris(2026, 3, 13, 13, 30));
    assert!(blocks
        .iter()
        .all(|b| is_business_day(b.start().date_naive()) && b.duration_minutes() == 210));
    assert!(blocks.windows(2).all(|w| w[0].end() < w[1].start()));
}

#[test]
fn range_bounds_are_inclusive() {
    let config = Config::default();
    let blocks: Vec<_> = working_blocks(date(2026, 3, 6), date(2026, 3, 9), &config).collect();
    let days: Vec<u32> = blocks.iter().map(|b| b.start().day()).collect();
    assert_eq!(days, vec![6, 9]);
}

#[test]
fn weekend_only_range_is_empty() {
    let config = Config::default();
    assert_eq!(working_blocks(date(2026, 3, 7), date(2026, 3, 8), &config).count(), 0);
}

#[test]
fn inverted_range_is_empty() {
    let config = Config::default();
    assert_eq!(working_blocks(date(2026, 3, 9), date(2026, 3, 2), &config).count(), 0);
}

#[test]
fn blocks_keep_wall_clock_across_dst() {
    let config = Config::default();
    // Fri 2026-03-27 (CET) and Mon 2026-03-30 (CEST).
    let blocks: Vec<_> = working_blocks(date(2026, 3, 27), date(2026, 3, 30), &config).collect();
    assert_eq!(blocks.len(), 2);
    for block in &blocks {
        assert_eq!((block.start().hour(), block.start().minute()), (13, 30));
        assert_eq!(block.duration_minutes(), 210);
    }
}

#[test]
fn block_in_dst_gap_follows_policy() {
    // Cairo springs forward on Friday 2026-04-24 at 00:00 → 01:00, so a
    // 00:30 start does not exist that day.
    let cairo = chrono_tz::Africa::Cairo;
    let day = date(2026, 4, 24);

    let skip = Config::new(cairo, hm(0, 30), hm(3, 0))
        .unwrap()
        .with_dst_policy(DstPolicy::Skip);
    assert_eq!(working_blocks(day, day, &skip).count(), 0);

    let shift = skip.with_dst_policy(DstPolicy::ShiftForward);
    let blocks: Vec<_> = working_blocks(day, day, &shift).collect();
    assert_eq!(blocks.len(), 1);
    assert_eq!((blocks[0].start().hour(), blocks[0].start().minute()), (1, 30));
    assert_eq!(blocks[0].end().hour(), 3);
}
