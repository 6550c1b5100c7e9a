//! # slot-engine
//!
//! Open meeting slots from a busy calendar.
//!
//! Given event records (possibly recurring), a scan window and a weekly
//! working-hour template, the engine computes the complement: contiguous free
//! intervals inside working hours, padded by a buffer around busy time and
//! filtered to a minimum useful length. Recurrence rules are expanded with the
//! `rrule` crate; all wall-clock math is DST-aware through `chrono-tz`.
//!
//! ## Modules
//!
//! - [`event`] — event records as produced by a calendar-file codec
//! - [`expander`] — event record → concrete occurrences inside the window
//! - [`interval`] — `Interval` and the linear merge of sorted intervals
//! - [`workdays`] — working-hour blocks and business-day arithmetic
//! - [`availability`] — buffered busy time subtracted from working blocks
//! - [`window`] — the scan window and its derivation from "today"
//! - [`config`] — run configuration and its validation
//! - [`dst`] — DST gap/overlap policy for local times
//! - [`error`] — Error types
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{compute_availability, Config, EventSpec, ScanWindow};
//!
//! let config = Config::default(); // Europe/Paris, 13:30–17:00, buffer 10, min 44
//! let today = NaiveDate::from_ymd_opt(2026, 2, 25).unwrap(); // Wednesday
//! let window = ScanWindow::from_today(today, 1, &config).unwrap(); // opens Monday 2026-03-02
//!
//! let standup = EventSpec::new(
//!     "2026-03-02T15:00:00".parse().unwrap(),
//!     "2026-03-02T15:30:00".parse().unwrap(),
//! );
//!
//! let availability = compute_availability(&[standup], &window, &config).unwrap();
//! let first = availability.slots[0];
//! assert_eq!(first.start().format("%H:%M").to_string(), "13:30");
//! assert_eq!(first.end().format("%H:%M").to_string(), "14:50");
//! ```

pub mod availability;
pub mod config;
pub mod dst;
pub mod error;
pub mod event;
pub mod expander;
pub mod interval;
pub mod window;
pub mod workdays;

pub use availability::{compute_available_slots, total_available};
pub use config::Config;
pub use error::SlotError;
pub use event::{EventSpec, EventTime};
pub use expander::{collect_busy, expand_event, EventWarning};
pub use interval::{merge_intervals, Interval};
pub use window::ScanWindow;
pub use workdays::{advance_business_days, working_blocks};

use tracing::debug;

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct Availability {
    /// Available slots, chronological.
    pub slots: Vec<Interval>,
    /// Number of busy occurrences found in the window (before padding/merging).
    pub busy_count: usize,
    /// Number of working blocks generated for the window.
    pub block_count: usize,
    /// Events that were skipped or degraded.
    pub warnings: Vec<EventWarning>,
}

/// Run the whole pipeline: expand events, build working blocks for the
/// window's dates, subtract.
///
/// # Errors
/// Returns `SlotError::InvalidConfig` before any work if the configuration is
/// invalid. Per-event problems never fail the run; they land in
/// [`Availability::warnings`].
pub fn compute_availability(
    events: &[EventSpec],
    window: &ScanWindow,
    config: &Config,
) -> error::Result<Availability> {
    config.validate()?;

    let collected = collect_busy(events, window, config);

    let (first, last) = window.dates(config.timezone());
    let blocks: Vec<Interval> = working_blocks(first, last, config).collect();
    debug!(blocks = blocks.len(), "generated working blocks");

    let slots = compute_available_slots(&blocks, &collected.busy, config);

    Ok(Availability {
        slots,
        busy_count: collected.busy.len(),
        block_count: blocks.len(),
        warnings: collected.warnings,
    })
}
