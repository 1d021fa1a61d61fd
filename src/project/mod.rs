//! Project creation from accepted quotes.
//!
//! The orchestrator schedules tasks for a quote, appends them to the
//! task store as a single batch, and summarizes the result. Partial
//! writes are a store-level concern; nothing is retried here.

pub mod status;

pub use status::{project_status, ProjectStatus, ProjectStatusReport};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quote::QuoteData;
use crate::store::TaskStore;
use crate::tasks::{schedule_tasks, SchedulerOptions};

/// Errors from project creation.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The task store rejected the batch append.
    #[error("project creation failed: {0}")]
    Creation(#[source] anyhow::Error),
}

/// Derived summary of a scheduling run. Computed once per run, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub total_tasks: usize,
    /// Human-readable duration derived from total hours at 8 per day.
    pub estimated_duration: String,
    pub total_hours: f64,
    /// Non-empty categories in emission order, de-duplicated.
    pub categories: Vec<String>,
}

/// Outcome of a project creation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutcome {
    pub tasks_created: usize,
    pub summary: ProjectSummary,
}

fn summarize(tasks: &[crate::tasks::TaskRow]) -> ProjectSummary {
    let total_hours: f64 = tasks.iter().map(|t| t.estimated_hours).sum();

    let mut categories: Vec<String> = Vec::new();
    for task in tasks {
        if !task.category.is_empty() && !categories.contains(&task.category) {
            categories.push(task.category.clone());
        }
    }

    let work_days = (total_hours / 8.0).ceil() as u64;
    let estimated_duration = if work_days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", work_days)
    };

    ProjectSummary {
        total_tasks: tasks.len(),
        estimated_duration,
        total_hours,
        categories,
    }
}

/// Runs the scheduler and persists the resulting rows.
pub struct ProjectOrchestrator {
    store: Arc<dyn TaskStore>,
}

impl ProjectOrchestrator {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Create a project from a validated quote: schedule its tasks,
    /// append them to the store in one batch, and return the summary.
    /// Options are per call, so concurrent requests can route and
    /// buffer differently.
    ///
    /// Store failures are wrapped as [`ProjectError::Creation`] with
    /// the underlying cause; there is no partial-success reporting.
    pub async fn create_project(
        &self,
        quote: &QuoteData,
        options: &SchedulerOptions,
    ) -> Result<ProjectOutcome, ProjectError> {
        tracing::info!("Creating project from quote {}", quote.id);

        let tasks = schedule_tasks(quote, options);

        self.store
            .append_tasks(&tasks)
            .await
            .map_err(ProjectError::Creation)?;

        let summary = summarize(&tasks);
        tracing::info!(
            "Project created successfully: {} tasks, {} hours estimated",
            summary.total_tasks,
            summary.total_hours
        );

        Ok(ProjectOutcome {
            tasks_created: tasks.len(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::*;
    use crate::tasks::{SchedulerOverrides, TaskRow};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Store that records appended batches in memory.
    #[derive(Default)]
    struct RecordingStore {
        batches: AtomicUsize,
        rows: Mutex<Vec<TaskRow>>,
        fail: bool,
    }

    #[async_trait]
    impl TaskStore for RecordingStore {
        async fn append_tasks(&self, tasks: &[TaskRow]) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("sheet unavailable");
            }
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.rows.lock().unwrap().extend_from_slice(tasks);
            Ok(())
        }

        async fn fetch_tasks(&self) -> anyhow::Result<Vec<TaskRow>> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn quote() -> QuoteData {
        let created_at = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        QuoteData {
            id: "Q-PRJ".to_string(),
            client_name: "Valued Customer".to_string(),
            client_email: String::new(),
            client_phone: None,
            property: PropertyDetails {
                address: "12 Sample St".to_string(),
                property_type: PropertyType::Residential,
                size: None,
                year_built: None,
                condition: PropertyCondition::Good,
            },
            services: vec![
                ServiceItem {
                    id: "S-1".to_string(),
                    category: "Electrical".to_string(),
                    description: "Replace switchboard".to_string(),
                    quantity: 1.0,
                    unit: "item".to_string(),
                    unit_price: 1100.0,
                    total_price: 1100.0,
                    notes: None,
                },
                ServiceItem {
                    id: "S-2".to_string(),
                    category: "Painting".to_string(),
                    description: "Paint hallway".to_string(),
                    quantity: 10.0,
                    unit: "square meters".to_string(),
                    unit_price: 25.0,
                    total_price: 250.0,
                    notes: None,
                },
            ],
            subtotal: 1350.0,
            gst: 135.0,
            total: 1485.0,
            valid_until: created_at.date_naive(),
            notes: None,
            created_at,
            status: QuoteStatus::Accepted,
        }
    }

    #[tokio::test]
    async fn appends_one_batch_and_summarizes() {
        let store = Arc::new(RecordingStore::default());
        let orchestrator = ProjectOrchestrator::new(store.clone());

        let outcome = orchestrator
            .create_project(&quote(), &SchedulerOptions::default())
            .await
            .unwrap();

        assert_eq!(store.batches.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.tasks_created, 6);
        assert_eq!(outcome.summary.total_tasks, 6);
        // 1 + 2 + 1 (item) + 5 (sqm) + 2 + 1 fixed/service hours.
        assert_eq!(outcome.summary.total_hours, 12.0);
        assert_eq!(outcome.summary.estimated_duration, "2 days");
        assert_eq!(
            outcome.summary.categories,
            vec!["Admin", "Procurement", "Electrical", "Painting", "QA"]
        );
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_creation_error() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let orchestrator = ProjectOrchestrator::new(store.clone());

        let err = orchestrator
            .create_project(&quote(), &SchedulerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::Creation(_)));
        assert_eq!(store.batches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn caller_options_route_and_buffer_each_call() {
        let store = Arc::new(RecordingStore::default());
        let orchestrator = ProjectOrchestrator::new(store.clone());

        let options = SchedulerOptions::default().with_overrides(SchedulerOverrides {
            default_assignee: Some("Ops Lead".to_string()),
            buffer_days: Some(5),
            auto_assign_by_category: None,
        });
        orchestrator
            .create_project(&quote(), &options)
            .await
            .unwrap();

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows[0].assignee, "Ops Lead");
        assert_eq!(rows[0].due, quote().created_at.date_naive() + chrono::Days::new(5));
        // The routing table still wins for matching categories.
        assert_eq!(rows[2].assignee, "Mike (Electrician)");
    }
}
