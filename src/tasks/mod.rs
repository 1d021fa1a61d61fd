//! Task derivation from accepted quotes.
//!
//! A quote's services expand into an ordered, assigned, due-dated task
//! list; the rows produced here are handed to the task store in one
//! batch and mutated externally afterwards.

pub mod estimate;
pub mod scheduler;

pub use scheduler::{schedule_tasks, SchedulerOptions, SchedulerOverrides};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Workflow state of a task row.
///
/// Rows are created as `Pending`; later transitions happen in the
/// external task-tracking system and are only read back here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    /// Parse a sheet cell value; unknown strings fall back to `Pending`.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "In Progress" => Self::InProgress,
            "Completed" => Self::Completed,
            "On Hold" => Self::OnHold,
            _ => Self::Pending,
        }
    }
}

/// Scheduling priority of a task row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Parse a sheet cell value; unknown strings fall back to `Medium`.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "Low" => Self::Low,
            "High" => Self::High,
            "Urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

/// One unit of scheduled, assigned work derived from a quote.
///
/// `job_id` is the originating quote id and groups every row derived
/// from that quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub job_id: String,
    pub task: String,
    pub assignee: String,
    pub status: TaskStatus,
    /// Calendar date only; scheduling has no time-of-day component.
    pub due: NaiveDate,
    #[serde(default)]
    pub category: String,
    pub priority: TaskPriority,
    pub estimated_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
