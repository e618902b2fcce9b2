//! Task types: the stored row, the add-form payload and the edit-form payload.
//!
//! Times are kept as [`NaiveTime`] in memory and as `HH:MM` text on disk
//! and on the wire. Dates use ISO `YYYY-MM-DD`.

pub mod lifecycle;
pub mod ordering;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Task priority.
///
/// Ordering for display uses [`Priority::rank`], where High comes first.
/// Input goes through [`FromStr`], so any casing is accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "String")]
pub enum Priority {
    #[default]
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort weight: High=0, Medium=1, Low=2.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Priority {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// A stored task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub done: bool,
}

impl Task {
    /// Label handed to the drag-reorder widget: `"<id>: <text>"`.
    pub fn reorder_label(&self) -> String {
        format!("{}: {}", self.id, self.text)
    }

    /// Edit payload pre-filled with the current values.
    pub fn to_edit(&self) -> TaskEdit {
        TaskEdit {
            text: self.text.clone(),
            priority: self.priority,
            due_date: self.due_date,
            start_time: self.start_time,
            end_time: self.end_time,
            done: self.done,
        }
    }
}

/// Payload of the "Add Task" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl NewTask {
    /// Trim the text and reject it when nothing is left.
    ///
    /// Start and end times are deliberately not compared.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.text = normalize_text(&self.text)?;
        Ok(self)
    }
}

/// Payload of the per-task edit form. Saving it replaces the whole row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEdit {
    pub text: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub done: bool,
}

impl TaskEdit {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.text = normalize_text(&self.text)?;
        Ok(self)
    }
}

fn normalize_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTaskText);
    }
    Ok(trimmed.to_string())
}

/// Parse an ISO date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|e| ValidationError::InvalidValue {
        field: "date".to_string(),
        message: format!("'{s}': {e}"),
    })
}

/// Parse a time of day. Accepts `HH:MM` and `HH:MM:SS` (seconds are dropped).
pub fn parse_time(s: &str) -> Result<NaiveTime, ValidationError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map(truncate_seconds)
        .map_err(|e| ValidationError::InvalidValue {
            field: "time".to_string(),
            message: format!("'{s}': {e}"),
        })
}

pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

fn truncate_seconds(t: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// Serde adapter storing [`NaiveTime`] as `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}
