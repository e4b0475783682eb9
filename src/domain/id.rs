//! Task identifiers
//!
//! A task ID is the creation time in milliseconds since the Unix epoch
//! (e.g. `1760781600123`). IDs are serialized as plain JSON integers.
//!
//! Two tasks created within the same millisecond would collide, so
//! [`TaskId::next`] bumps past the highest ID already in use. IDs are
//! therefore unique and strictly increasing in creation order. Once
//! `i64::MAX` is taken there is no greater ID and allocation fails.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID: expected a positive integer, got '{0}'")]
    InvalidTaskId(String),
}

/// Task ID derived from the creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw integer ID
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Allocates an ID for a task created at `timestamp`.
    ///
    /// `highest` is the largest ID currently known (live tasks and anything
    /// still held for undo). The result is always greater than it, or
    /// `None` when `highest` is already `i64::MAX`.
    pub fn next(timestamp: DateTime<Utc>, highest: Option<TaskId>) -> Option<Self> {
        let millis = timestamp.timestamp_millis();
        match highest {
            Some(TaskId(max)) if max >= millis => max.checked_add(1).map(TaskId),
            _ => Some(TaskId(millis)),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(TaskId(raw)),
            _ => Err(IdError::InvalidTaskId(s.to_string())),
        }
    }
}
