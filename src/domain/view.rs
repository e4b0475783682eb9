//! Display projections over the task list
//!
//! Filtering and sorting here never touch the stored order. Every call
//! builds a fresh sequence from the manual order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::task::{ParseError, Task};

/// Which subset of tasks is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Returns true if the task belongs in this view
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(ParseError::Filter(s.to_string())),
        }
    }
}

/// Display ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first
    #[default]
    Date,
    /// High before medium before low
    Priority,
    /// Earliest due date first, undated last
    Due,
    /// Incomplete before completed
    Status,
}

impl SortMode {
    /// Comparator for a stable sort
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortMode::Date => b.created_at.cmp(&a.created_at),
            SortMode::Priority => b.priority.weight().cmp(&a.priority.weight()),
            SortMode::Due => match (a.due_date, b.due_date) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => x.cmp(&y),
            },
            SortMode::Status => a.completed.cmp(&b.completed),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Priority => "priority",
            SortMode::Due => "due",
            SortMode::Status => "status",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "priority" => Ok(SortMode::Priority),
            "due" => Ok(SortMode::Due),
            "status" => Ok(SortMode::Status),
            _ => Err(ParseError::Sort(s.to_string())),
        }
    }
}

/// Filters then sorts a copy of `tasks`
pub fn project(tasks: &[Task], filter: Filter, sort: SortMode) -> Vec<Task> {
    let mut view: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    // slice::sort_by is stable, so ties keep manual order
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

/// Completion progress over the whole list (ignores the filter)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }

    /// Human-readable summary, e.g. `1 of 3 tasks completed`
    pub fn summary(&self) -> String {
        format!("{} of {} tasks completed", self.completed, self.total)
    }
}

/// Label for a due date relative to `today`
pub fn due_label(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        "Due today".to_string()
    } else if today.succ_opt() == Some(due) {
        "Due tomorrow".to_string()
    } else {
        format!("Due {}", due.format("%Y-%m-%d"))
    }
}
