//! RFC 5545 recurrence vectors -- derived from Section 3.8.5 examples, run
//! through the occurrence expander with a scan window doing the clipping.
//!
//! Rules are anchored at the event start, and the window (not COUNT) bounds
//! the output unless the rule carries its own COUNT/UNTIL.

use chrono::{Datelike, NaiveTime, TimeZone};
use slot_engine::expander::expand_event;
use slot_engine::{Config, EventSpec, Interval, ScanWindow};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn utc_config() -> Config {
    Config::new(
        chrono_tz::UTC,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
    .unwrap()
}

/// Window covering whole days `from..=to` in UTC.
fn window(from: (i32, u32, u32), to: (i32, u32, u32)) -> ScanWindow {
    ScanWindow::new(
        chrono_tz::UTC
            .with_ymd_and_hms(from.0, from.1, from.2, 0, 0, 0)
            .unwrap(),
        chrono_tz::UTC
            .with_ymd_and_hms(to.0, to.1, to.2, 23, 59, 59)
            .unwrap(),
    )
    .unwrap()
}

fn expand(rule: &str, start: &str, end: &str, window: ScanWindow) -> Vec<Interval> {
    let event = EventSpec::new(start.parse().unwrap(), end.parse().unwrap()).with_rrule(rule);
    expand_event(&event, &window, &utc_config()).expect("should expand")
}

fn dates(events: &[Interval]) -> Vec<(i32, u32, u32)> {
    events
        .iter()
        .map(|e| (e.start().year(), e.start().month(), e.start().day()))
        .collect()
}

// ===========================================================================
// 1. Every other week on Tuesday and Thursday (INTERVAL=2, multi-BYDAY)
// ===========================================================================

#[test]
fn biweekly_tue_thu_alternating_weeks() {
    // Week of Jan 5:  Tue Jan 6, Thu Jan 8
    // Skip week of Jan 12
    // Week of Jan 19: Tue Jan 20, Thu Jan 22
    // Skip week of Jan 26
    // Week of Feb 2:  Tue Feb 3, Thu Feb 5
    let result = expand(
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH",
        "2026-01-06T10:00:00",
        "2026-01-06T11:00:00",
        window((2026, 1, 1), (2026, 2, 8)),
    );

    assert_eq!(
        dates(&result),
        vec![
            (2026, 1, 6),
            (2026, 1, 8),
            (2026, 1, 20),
            (2026, 1, 22),
            (2026, 2, 3),
            (2026, 2, 5),
        ]
    );
    assert!(result.iter().all(|e| e.duration_minutes() == 60));
}

// ===========================================================================
// 2. Biweekly series entered mid-way: phase is kept from the anchor
// ===========================================================================

#[test]
fn biweekly_phase_survives_window_clipping() {
    // Window opens on the skipped week of Jan 12; the next hit is Jan 20.
    let result = expand(
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU,TH",
        "2026-01-06T10:00:00",
        "2026-01-06T11:00:00",
        window((2026, 1, 12), (2026, 1, 25)),
    );
    assert_eq!(dates(&result), vec![(2026, 1, 20), (2026, 1, 22)]);
}

// ===========================================================================
// 3. EXDATE exclusions — weekly Tuesday with excluded dates
// ===========================================================================

#[test]
fn exdate_excludes_specific_dates() {
    let event = EventSpec::new(
        "2026-03-03T10:00:00".parse().unwrap(),
        "2026-03-03T11:00:00".parse().unwrap(),
    )
    .with_rrule("FREQ=WEEKLY;BYDAY=TU")
    .with_exdates(vec![
        "2026-03-10T10:00:00".parse().unwrap(),
        "2026-03-17T10:00:00".parse().unwrap(),
        "2026-03-31T10:00:00".parse().unwrap(),
    ]);

    let result = expand_event(&event, &window((2026, 3, 1), (2026, 4, 7)), &utc_config()).unwrap();

    assert_eq!(
        dates(&result),
        vec![(2026, 3, 3), (2026, 3, 24), (2026, 4, 7)],
        "6 Tuesdays minus 3 excluded"
    );
}

// ===========================================================================
// 4. INTERVAL — FREQ=MONTHLY;INTERVAL=3 (quarterly)
// ===========================================================================

#[test]
fn monthly_interval_three_quarterly() {
    let result = expand(
        "FREQ=MONTHLY;INTERVAL=3",
        "2026-03-15T09:00:00",
        "2026-03-15T10:00:00",
        window((2026, 1, 1), (2027, 3, 31)),
    );
    assert_eq!(
        dates(&result),
        vec![
            (2026, 3, 15),
            (2026, 6, 15),
            (2026, 9, 15),
            (2026, 12, 15),
            (2027, 3, 15),
        ]
    );
}

// ===========================================================================
// 5. BYSETPOS + BYDAY — last weekday of each month
// ===========================================================================

#[test]
fn last_weekday_of_month_bysetpos_neg1() {
    let result = expand(
        "FREQ=MONTHLY;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1",
        "2026-01-30T16:00:00",
        "2026-01-30T16:30:00",
        window((2026, 1, 1), (2026, 6, 30)),
    );
    assert_eq!(
        dates(&result),
        vec![
            (2026, 1, 30),
            (2026, 2, 27),
            (2026, 3, 31),
            (2026, 4, 30),
            (2026, 5, 29),
            (2026, 6, 30),
        ]
    );
}

// ===========================================================================
// 6. Multi-rule intersection: second Tuesday of January and June only
// ===========================================================================

#[test]
fn second_tuesday_of_jan_and_jun() {
    let result = expand(
        "FREQ=MONTHLY;BYMONTH=1,6;BYDAY=TU;BYSETPOS=2",
        "2026-01-13T14:00:00",
        "2026-01-13T15:00:00",
        window((2026, 1, 1), (2027, 12, 31)),
    );
    assert_eq!(
        dates(&result),
        vec![(2026, 1, 13), (2026, 6, 9), (2027, 1, 12), (2027, 6, 8)]
    );
}

// ===========================================================================
// 7. COUNT caps a series even when the window is wider
// ===========================================================================

#[test]
fn count_caps_daily_series() {
    let result = expand(
        "FREQ=DAILY;COUNT=5",
        "2026-06-01T09:00:00",
        "2026-06-01T09:15:00",
        window((2026, 6, 1), (2026, 6, 30)),
    );
    assert_eq!(result.len(), 5);
    assert_eq!(dates(&result)[4], (2026, 6, 5));
}

// ===========================================================================
// 8. Weekdays-only daily series across a weekend
// ===========================================================================

#[test]
fn daily_weekdays_only_skips_weekend() {
    // Fri 2026-03-06 → Mon 9, Tue 10.
    let result = expand(
        "FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR",
        "2026-03-06T12:00:00",
        "2026-03-06T12:30:00",
        window((2026, 3, 6), (2026, 3, 10)),
    );
    assert_eq!(
        dates(&result),
        vec![(2026, 3, 6), (2026, 3, 9), (2026, 3, 10)]
    );
}
