//! Project status aggregation over task rows.
//!
//! Pure function over rows sharing one job id; row order is
//! irrelevant. Task status changes happen in the external tracking
//! system, so this only ever reads.

use serde::{Deserialize, Serialize};

use crate::tasks::{TaskRow, TaskStatus};

/// Overall project state derived from its task rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }
}

/// Aggregated status over one project's task rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusReport {
    pub status: ProjectStatus,
    /// 0-100, rounded.
    pub progress_percent: u32,
    pub completed_count: usize,
    pub total_count: usize,
}

/// Derive the overall status and completion percentage for a set of
/// task rows.
///
/// Precedence: all completed, then any on hold, then any started,
/// otherwise not started. An empty set is not started at 0%.
pub fn project_status(tasks: &[TaskRow]) -> ProjectStatusReport {
    let total_count = tasks.len();
    let completed_count = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    let on_hold = tasks.iter().any(|t| t.status == TaskStatus::OnHold);
    let in_progress = tasks.iter().any(|t| t.status == TaskStatus::InProgress);

    let status = if total_count > 0 && completed_count == total_count {
        ProjectStatus::Completed
    } else if on_hold {
        ProjectStatus::OnHold
    } else if in_progress || completed_count > 0 {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::NotStarted
    };

    let progress_percent = if total_count > 0 {
        ((completed_count as f64 / total_count as f64) * 100.0).round() as u32
    } else {
        0
    };

    ProjectStatusReport {
        status,
        progress_percent,
        completed_count,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskPriority;
    use chrono::NaiveDate;

    fn row(status: TaskStatus) -> TaskRow {
        TaskRow {
            job_id: "Q-JOB".to_string(),
            task: "Work".to_string(),
            assignee: "Team Lead".to_string(),
            status,
            due: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            category: "General".to_string(),
            priority: TaskPriority::Medium,
            estimated_hours: 1.0,
            notes: None,
        }
    }

    #[test]
    fn mixed_progress_is_in_progress_at_half() {
        let tasks = vec![
            row(TaskStatus::Completed),
            row(TaskStatus::Completed),
            row(TaskStatus::InProgress),
            row(TaskStatus::Pending),
        ];
        let report = project_status(&tasks);
        assert_eq!(report.status, ProjectStatus::InProgress);
        assert_eq!(report.progress_percent, 50);
        assert_eq!(report.completed_count, 2);
        assert_eq!(report.total_count, 4);
    }

    #[test]
    fn empty_set_is_not_started() {
        let report = project_status(&[]);
        assert_eq!(report.status, ProjectStatus::NotStarted);
        assert_eq!(report.progress_percent, 0);
        assert_eq!(report.total_count, 0);
    }

    #[test]
    fn all_completed_beats_everything() {
        let report = project_status(&[row(TaskStatus::Completed), row(TaskStatus::Completed)]);
        assert_eq!(report.status, ProjectStatus::Completed);
        assert_eq!(report.progress_percent, 100);
    }

    #[test]
    fn on_hold_takes_precedence_over_progress() {
        let tasks = vec![
            row(TaskStatus::Completed),
            row(TaskStatus::OnHold),
            row(TaskStatus::InProgress),
        ];
        assert_eq!(project_status(&tasks).status, ProjectStatus::OnHold);
    }

    #[test]
    fn completed_work_alone_counts_as_started() {
        let tasks = vec![row(TaskStatus::Completed), row(TaskStatus::Pending)];
        assert_eq!(project_status(&tasks).status, ProjectStatus::InProgress);
    }

    #[test]
    fn untouched_tasks_are_not_started() {
        let tasks = vec![row(TaskStatus::Pending), row(TaskStatus::Pending)];
        assert_eq!(project_status(&tasks).status, ProjectStatus::NotStarted);
    }
}
