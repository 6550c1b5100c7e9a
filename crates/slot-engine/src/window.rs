//! The scan window: the span of time in which occurrences and working blocks
//! are considered.

use crate::config::Config;
use crate::error::{Result, SlotError};
use crate::workdays::{advance_business_days, start_of_day};
use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;

/// Default number of weeks scanned after the lead days.
pub const DEFAULT_WEEKS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl ScanWindow {
    /// # Errors
    /// Returns `SlotError::InvalidWindow` if `end` is before `start`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        if end < start {
            return Err(SlotError::InvalidWindow(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// The window a run starting on `today` scans: it opens at the start of the
    /// day `lead_days` business days after `today` and lasts `weeks` weeks.
    pub fn from_today(today: NaiveDate, weeks: u32, config: &Config) -> Result<Self> {
        config.validate()?;
        let reference = start_of_day(config.timezone(), today);
        let start = advance_business_days(reference, config.lead_days()).ok_or_else(|| {
            SlotError::InvalidWindow(format!(
                "{} business days after {} is out of range",
                config.lead_days(),
                today
            ))
        })?;
        // Wall-clock weeks: the end stays at midnight across DST changes.
        let last = start
            .date_naive()
            .checked_add_days(Days::new(u64::from(weeks) * 7))
            .ok_or_else(|| SlotError::InvalidWindow(format!("{} weeks is out of range", weeks)))?;
        Self::new(start, start_of_day(config.timezone(), last))
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Tz>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// First and last calendar dates touched by the window, in `tz`.
    pub fn dates(&self, tz: Tz) -> (NaiveDate, NaiveDate) {
        (
            self.start.with_timezone(&tz).date_naive(),
            self.end.with_timezone(&tz).date_naive(),
        )
    }
}
