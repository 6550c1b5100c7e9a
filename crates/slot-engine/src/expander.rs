//! Occurrence expansion -- turns event records into concrete busy intervals
//! inside a scan window.
//!
//! Recurrence rules are compiled with the `rrule` crate (v0.13) into an
//! `RRuleSet` anchored at the event's own start in the event's zone, then
//! walked lazily: the walk stops at the first generated start past the end of
//! the window, so unbounded rules are fine.
//!
//! One bad event never aborts a batch. An unparseable rule degrades to the
//! event's own start/end; malformed fields drop the event. Both are reported
//! as [`EventWarning`]s and logged through `tracing`.

use crate::config::Config;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::event::EventSpec;
use crate::interval::{sort_intervals, Interval};
use crate::window::ScanWindow;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use rrule::RRuleSet;
use std::fmt;
use tracing::{debug, warn};

/// A resolved event: concrete start, fixed duration and optional compiled rule.
#[derive(Debug, Clone)]
pub struct Schedule {
    start: DateTime<Tz>,
    duration: Duration,
    rule: Option<RRuleSet>,
}

impl Schedule {
    /// Resolve `event` in `tz`, compiling its recurrence rule if present.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidEvent` for missing or inconsistent start/end
    /// and `SlotError::InvalidRule` if the rule does not compile.
    pub fn resolve(event: &EventSpec, tz: Tz, policy: DstPolicy) -> Result<Self> {
        let mut schedule = Self::one_off(event, tz, policy)?;
        if let Some(rule) = rule_text(event) {
            let exdates: Vec<DateTime<Tz>> = event
                .exdates
                .iter()
                .filter_map(|ex| ex.resolve(tz, policy))
                .collect();
            schedule.rule = Some(compile_rule(rule, schedule.start, &exdates)?);
        }
        Ok(schedule)
    }

    /// Resolve `event` ignoring any recurrence rule.
    pub fn one_off(event: &EventSpec, tz: Tz, policy: DstPolicy) -> Result<Self> {
        let start = event
            .start
            .ok_or_else(|| SlotError::InvalidEvent("missing start".to_string()))?
            .resolve(tz, policy)
            .ok_or_else(|| SlotError::InvalidEvent("start falls in a DST gap".to_string()))?;
        let end = event
            .end
            .ok_or_else(|| SlotError::InvalidEvent("missing end".to_string()))?
            .resolve(tz, policy)
            .ok_or_else(|| SlotError::InvalidEvent("end falls in a DST gap".to_string()))?;
        if end <= start {
            return Err(SlotError::InvalidEvent(format!(
                "end {} is not after start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self {
            start,
            duration: end - start,
            rule: None,
        })
    }

    pub fn is_recurring(&self) -> bool {
        self.rule.is_some()
    }

    /// Every occurrence whose start lies in the window (both ends inclusive).
    pub fn occurrences<'a>(&'a self, window: &'a ScanWindow) -> Occurrences<'a> {
        let state = match &self.rule {
            None => State::Single(
                window
                    .contains(self.start)
                    .then_some(self.start)
                    .and_then(|start| Interval::new(start, start + self.duration).ok()),
            ),
            Some(rule) => State::Recurring(Box::new(rule.into_iter())),
        };
        Occurrences {
            state,
            duration: self.duration,
            zone: self.start.timezone(),
            window,
        }
    }
}

/// Lazy occurrence sequence returned by [`Schedule::occurrences`].
pub struct Occurrences<'a> {
    state: State<'a>,
    duration: Duration,
    zone: Tz,
    window: &'a ScanWindow,
}

enum State<'a> {
    Single(Option<Interval>),
    Recurring(Box<dyn Iterator<Item = DateTime<rrule::Tz>> + 'a>),
    Done,
}

impl Iterator for Occurrences<'_> {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        match &mut self.state {
            State::Single(slot) => {
                let next = slot.take();
                self.state = State::Done;
                next
            }
            State::Recurring(iter) => {
                for generated in iter.by_ref() {
                    let start = generated.with_timezone(&self.zone);
                    // Rule output is non-decreasing, so nothing later can match.
                    if start > self.window.end() {
                        break;
                    }
                    if start < self.window.start() {
                        continue;
                    }
                    if let Ok(interval) = Interval::new(start, start + self.duration) {
                        return Some(interval);
                    }
                }
                self.state = State::Done;
                None
            }
            State::Done => None,
        }
    }
}

/// The event's rule with any "RRULE:" prefix stripped, or `None` if absent/blank.
fn rule_text(event: &EventSpec) -> Option<&str> {
    let raw = event.rrule.as_deref()?.trim();
    let rule = raw
        .strip_prefix("RRULE:")
        .or_else(|| raw.strip_prefix("rrule:"))
        .unwrap_or(raw)
        .trim();
    (!rule.is_empty()).then_some(rule)
}

/// Build the iCalendar text block (DTSTART, RRULE, EXDATE) and parse it.
fn compile_rule(rule: &str, start: DateTime<Tz>, exdates: &[DateTime<Tz>]) -> Result<RRuleSet> {
    let tzid = start.timezone().name();
    let mut text = format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        tzid,
        start.format("%Y%m%dT%H%M%S"),
        rule
    );

    if !exdates.is_empty() {
        let stamps: Vec<String> = exdates
            .iter()
            .map(|dt| {
                dt.with_timezone(&start.timezone())
                    .format("%Y%m%dT%H%M%S")
                    .to_string()
            })
            .collect();
        text.push_str(&format!("\nEXDATE;TZID={}:{}", tzid, stamps.join(",")));
    }

    text.parse::<RRuleSet>()
        .map_err(|e| SlotError::InvalidRule(format!("{}: {}", rule, e)))
}

/// Expand one event into its occurrences inside `window`, expressed in the
/// configured zone.
///
/// A rule that fails to compile is logged and the event is treated as
/// non-recurring.
///
/// # Errors
/// Returns `SlotError::InvalidEvent` or `SlotError::InvalidTimezone` when the
/// event itself is malformed; the caller decides whether to skip it.
pub fn expand_event(
    event: &EventSpec,
    window: &ScanWindow,
    config: &Config,
) -> Result<Vec<Interval>> {
    expand_with_diagnostic(event, window, config).map(|(occurrences, _)| occurrences)
}

/// Like [`expand_event`], also handing back the rule error when the event was
/// degraded to a one-off.
fn expand_with_diagnostic(
    event: &EventSpec,
    window: &ScanWindow,
    config: &Config,
) -> Result<(Vec<Interval>, Option<SlotError>)> {
    let zone = event.zone(config.timezone())?;
    let policy = config.dst_policy();

    let (schedule, degraded) = match Schedule::resolve(event, zone, policy) {
        Ok(schedule) => (schedule, None),
        Err(e @ SlotError::InvalidRule(_)) => {
            warn!(
                event = event.label(),
                error = %e,
                "could not parse recurrence rule, treating as one-off"
            );
            (Schedule::one_off(event, zone, policy)?, Some(e))
        }
        Err(e) => return Err(e),
    };

    let occurrences: Vec<Interval> = schedule
        .occurrences(window)
        .map(|occurrence| occurrence.with_timezone(config.timezone()))
        .collect();
    debug!(
        event = event.label(),
        recurring = schedule.is_recurring(),
        occurrences = occurrences.len(),
        "expanded event"
    );
    Ok((occurrences, degraded))
}

/// A per-event diagnostic: the event was dropped or degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct EventWarning {
    /// Position of the event in the input list.
    pub index: usize,
    pub label: String,
    pub reason: String,
}

impl fmt::Display for EventWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event #{} ({}): {}", self.index, self.label, self.reason)
    }
}

/// Busy time collected from a batch of events.
#[derive(Debug, Clone, Default)]
pub struct BusyCollection {
    /// All occurrences, sorted ascending by start.
    pub busy: Vec<Interval>,
    pub warnings: Vec<EventWarning>,
}

/// Expand every event and gather the occurrences into one sorted busy list.
///
/// Malformed events are skipped and degraded rules fall back to one-offs; both
/// leave an [`EventWarning`]. The rest of the batch is still processed.
pub fn collect_busy(events: &[EventSpec], window: &ScanWindow, config: &Config) -> BusyCollection {
    let mut collection = BusyCollection::default();

    for (index, event) in events.iter().enumerate() {
        match expand_with_diagnostic(event, window, config) {
            Ok((occurrences, degraded)) => {
                collection.busy.extend(occurrences);
                if let Some(e) = degraded {
                    collection.warnings.push(EventWarning {
                        index,
                        label: event.label().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
            Err(e) => {
                warn!(event = event.label(), error = %e, "skipping unparseable event");
                collection.warnings.push(EventWarning {
                    index,
                    label: event.label().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    sort_intervals(&mut collection.busy);
    debug!(
        events = events.len(),
        busy = collection.busy.len(),
        skipped = collection.warnings.len(),
        "collected busy intervals"
    );
    collection
}
