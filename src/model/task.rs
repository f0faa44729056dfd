use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Next priority in the low → medium → high → low cycle
    pub fn cycle(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid priority '{0}' (expected low, medium or high)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single todo entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier, unique within a collection
    pub id: String,
    /// Description (never blank)
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Optional calendar due date
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Create an open, medium-priority task with no due date
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            text: text.into(),
            completed: false,
            priority: Priority::default(),
            due_date: None,
        }
    }
}

/// A sparse set of field overwrites for a task.
///
/// `due_date` is tri-state: `None` leaves the date alone, `Some(None)`
/// clears it, `Some(Some(d))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        TaskPatch {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        TaskPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        TaskPatch {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn due_date(due_date: Option<NaiveDate>) -> Self {
        TaskPatch {
            due_date: Some(due_date),
            ..Default::default()
        }
    }

    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}
