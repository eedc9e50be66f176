use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audit event categories exposed by the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEventType {
    SuccessfulLoginAttempt,
    FailedLoginAttempt,
    PasswordChange,
    PasswordReset,
}

impl LogEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEventType::SuccessfulLoginAttempt => "SUCCESSFUL_LOGIN_ATTEMPT",
            LogEventType::FailedLoginAttempt => "FAILED_LOGIN_ATTEMPT",
            LogEventType::PasswordChange => "PASSWORD_CHANGE",
            LogEventType::PasswordReset => "PASSWORD_RESET",
        }
    }
}

impl fmt::Display for LogEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical audit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub event_type: LogEventType,
    /// Platform (external) user id of the subject
    pub user_id: String,
    pub ip: String,
    pub tenant: String,
    pub timestamp: DateTime<Utc>,
}

/// One page of the merged audit feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEventCollection {
    pub logging_event: Vec<LogEvent>,
    /// Number of events in this page, not in the whole feed
    pub total_records: usize,
}

impl LogEventCollection {
    pub fn new(logging_event: Vec<LogEvent>) -> Self {
        let total_records = logging_event.len();
        Self {
            logging_event,
            total_records,
        }
    }
}

/// Requested slice of the feed, 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub offset: usize,
    pub length: usize,
}

impl EventWindow {
    pub const DEFAULT_LENGTH: usize = 100;

    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Events that must be read from each source to serve this window.
    pub fn max_records(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Range of a merged feed of `total` events covered by this window.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        if self.offset >= total {
            return total..total;
        }
        self.offset..self.max_records().min(total)
    }
}

impl Default for EventWindow {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LENGTH)
    }
}
