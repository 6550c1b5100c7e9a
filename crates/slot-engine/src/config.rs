//! Run configuration: timezone, working hours, lead days, buffer and minimum
//! slot length.
//!
//! A [`Config`] is built once per run and passed by reference into every
//! component. It is never mutated after construction.

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;
pub const DEFAULT_WORK_START: (u32, u32) = (13, 30);
pub const DEFAULT_WORK_END: (u32, u32) = (17, 0);
pub const DEFAULT_LEAD_DAYS: u32 = 3;
pub const DEFAULT_BUFFER_MINUTES: u32 = 10;
pub const DEFAULT_MIN_SLOT_MINUTES: u32 = 44;
/// Upper bound on lead days, roughly 40 years of business days.
pub const MAX_LEAD_DAYS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    timezone: Tz,
    work_start: NaiveTime,
    work_end: NaiveTime,
    lead_days: u32,
    buffer_minutes: u32,
    min_slot_minutes: u32,
    dst_policy: DstPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            work_start: hm(DEFAULT_WORK_START),
            work_end: hm(DEFAULT_WORK_END),
            lead_days: DEFAULT_LEAD_DAYS,
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            min_slot_minutes: DEFAULT_MIN_SLOT_MINUTES,
            dst_policy: DstPolicy::default(),
        }
    }
}

fn hm((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

impl Config {
    /// Build a configuration with the given zone and working hours; the
    /// remaining knobs take their defaults.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidConfig` if `work_end` is not after `work_start`.
    pub fn new(timezone: Tz, work_start: NaiveTime, work_end: NaiveTime) -> Result<Self> {
        let config = Self {
            timezone,
            work_start,
            work_end,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_lead_days(mut self, lead_days: u32) -> Self {
        self.lead_days = lead_days;
        self
    }

    pub fn with_buffer_minutes(mut self, buffer_minutes: u32) -> Self {
        self.buffer_minutes = buffer_minutes;
        self
    }

    pub fn with_min_slot_minutes(mut self, min_slot_minutes: u32) -> Self {
        self.min_slot_minutes = min_slot_minutes;
        self
    }

    pub fn with_dst_policy(mut self, dst_policy: DstPolicy) -> Self {
        self.dst_policy = dst_policy;
        self
    }

    /// Check the invariants every pipeline entry point relies on.
    pub fn validate(&self) -> Result<()> {
        if self.work_end <= self.work_start {
            return Err(SlotError::InvalidConfig(format!(
                "work end {} must be after work start {}",
                self.work_end.format("%H:%M"),
                self.work_start.format("%H:%M"),
            )));
        }
        if self.lead_days > MAX_LEAD_DAYS {
            return Err(SlotError::InvalidConfig(format!(
                "lead days {} exceeds the maximum of {}",
                self.lead_days, MAX_LEAD_DAYS
            )));
        }
        Ok(())
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn work_start(&self) -> NaiveTime {
        self.work_start
    }

    pub fn work_end(&self) -> NaiveTime {
        self.work_end
    }

    pub fn lead_days(&self) -> u32 {
        self.lead_days
    }

    pub fn buffer_minutes(&self) -> u32 {
        self.buffer_minutes
    }

    pub fn min_slot_minutes(&self) -> u32 {
        self.min_slot_minutes
    }

    pub fn dst_policy(&self) -> DstPolicy {
        self.dst_policy
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_minutes))
    }

    pub fn min_slot(&self) -> Duration {
        Duration::minutes(i64::from(self.min_slot_minutes))
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SlotError::InvalidTime(value.to_string()))
}

/// Parse an IANA timezone identifier (e.g., "Europe/Paris").
pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse()
        .map_err(|_| SlotError::InvalidTimezone(value.to_string()))
}
