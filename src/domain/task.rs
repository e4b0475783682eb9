//! Task domain model
//!
//! A task is a short line of text with a completion flag, a priority and an
//! optional due date. The serialized shape uses camelCase keys
//! (`dueDate`, `createdAt`) so stored lists stay readable by other tools.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

/// Errors from parsing user-supplied values (priority, filter, sort, dates)
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid priority '{0}': expected low, medium or high")]
    Priority(String),

    #[error("Invalid filter '{0}': expected all, active or completed")]
    Filter(String),

    #[error("Invalid sort '{0}': expected date, priority, due or status")]
    Sort(String),

    #[error("Invalid due date '{0}': expected YYYY-MM-DD")]
    DueDate(String),
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight; higher sorts first under the priority sort
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParseError::Priority(s.to_string())),
        }
    }
}

/// Parses a `YYYY-MM-DD` due date
pub fn parse_due_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| ParseError::DueDate(s.to_string()))
}

/// User input for a new task, before it has an ID
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Creates a draft with default priority and no due date
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Trimmed, non-empty text
    pub text: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub priority: Priority,

    /// Optional calendar due date, `null` when unset
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Creation time; never changes
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a task from a draft. Returns `None` when the trimmed text is empty.
    pub fn from_draft(id: TaskId, draft: TaskDraft, created_at: DateTime<Utc>) -> Option<Self> {
        let text = draft.text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            id,
            text: text.to_string(),
            completed: false,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at,
        })
    }

    /// Replaces the text if the trimmed replacement is non-empty.
    /// Returns true if the text was changed.
    pub fn rename(&mut self, new_text: &str) -> bool {
        let text = new_text.trim();
        if text.is_empty() {
            return false;
        }
        self.text = text.to_string();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn draft_text_is_trimmed() {
        let task = Task::from_draft(TaskId::from_raw(1), TaskDraft::new("  Buy milk \n"), created())
            .unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, created());
    }

    #[test]
    fn whitespace_draft_is_rejected() {
        assert!(Task::from_draft(TaskId::from_raw(1), TaskDraft::new("   \t"), created()).is_none());
    }

    #[test]
    fn rename_rejects_blank_text() {
        let mut task =
            Task::from_draft(TaskId::from_raw(1), TaskDraft::new("Walk dog"), created()).unwrap();
        assert!(!task.rename("   "));
        assert_eq!(task.text, "Walk dog");
        assert!(task.rename("  Walk the dog "));
        assert_eq!(task.text, "Walk the dog");
    }

    #[test]
    fn priority_weights_and_parsing() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(ParseError::Priority("urgent".to_string()))
        );
    }

    #[test]
    fn due_date_parsing() {
        assert_eq!(
            parse_due_date("2026-10-20").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
        );
        assert!(parse_due_date("20/10/2026").is_err());
    }

    #[test]
    fn serialized_shape() {
        let draft = TaskDraft::new("Buy milk")
            .priority(Priority::High)
            .due(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        let task = Task::from_draft(TaskId::from_raw(1760779800000), draft, created()).unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], 1760779800000i64);
        assert_eq!(value["text"], "Buy milk");
        assert_eq!(value["completed"], false);
        assert_eq!(value["priority"], "high");
        assert_eq!(value["dueDate"], "2026-10-20");
        assert_eq!(value["createdAt"], "2026-10-18T09:30:00Z");
    }

    #[test]
    fn reads_browser_style_records() {
        let json = r#"{
            "id": 1760779800000,
            "text": "Walk dog",
            "completed": true,
            "priority": "low",
            "dueDate": null,
            "createdAt": "2026-10-18T09:30:00.000Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::from_raw(1760779800000));
        assert!(task.completed);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, created());
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"id": 5, "text": "Old", "createdAt": "2026-10-18T09:30:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
    }
}
