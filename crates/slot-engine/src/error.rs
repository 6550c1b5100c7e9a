//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time of day: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: String, end: String },

    #[error("Invalid scan window: {0}")]
    InvalidWindow(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
