//! Task scheduling from a validated quote.
//!
//! Expands a quote into fixed pre-work tasks, one task per service in
//! service order, and fixed post-work tasks. Scheduling is
//! deterministic: the same quote and options always produce the same
//! rows, and every row inherits the quote id, so a batch is
//! identifiable by job id alone.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use super::estimate::{determine_priority, estimate_hours};
use super::{TaskPriority, TaskRow, TaskStatus};
use crate::quote::QuoteData;

/// Scheduling options: the default assignee, buffer before work starts,
/// and the category→assignee routing table.
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    pub default_assignee: String,
    /// Days between quote creation and the first task.
    pub buffer_days: u64,
    pub assign_by_category: HashMap<String, String>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        let assign_by_category = [
            ("Electrical", "Mike (Electrician)"),
            ("Plumbing", "Sarah (Plumber)"),
            ("Painting", "Alex (Painter)"),
            ("Carpentry", "David (Carpenter)"),
            ("Cleaning", "Clean Team"),
            ("Landscaping", "Garden Crew"),
            ("General", "Handyman Joe"),
        ]
        .into_iter()
        .map(|(category, assignee)| (category.to_string(), assignee.to_string()))
        .collect();

        Self {
            default_assignee: "Team Lead".to_string(),
            buffer_days: 2,
            assign_by_category,
        }
    }
}

/// Caller-supplied scheduling overrides; unset fields keep their
/// defaults. A supplied routing table replaces the default table
/// wholesale rather than merging into it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerOverrides {
    #[serde(default)]
    pub default_assignee: Option<String>,
    #[serde(default)]
    pub buffer_days: Option<u64>,
    #[serde(default)]
    pub auto_assign_by_category: Option<HashMap<String, String>>,
}

impl SchedulerOptions {
    /// Apply caller overrides on top of these options.
    pub fn with_overrides(mut self, overrides: SchedulerOverrides) -> Self {
        if let Some(assignee) = overrides.default_assignee {
            self.default_assignee = assignee;
        }
        if let Some(days) = overrides.buffer_days {
            self.buffer_days = days;
        }
        if let Some(table) = overrides.auto_assign_by_category {
            self.assign_by_category = table;
        }
        self
    }

    fn assignee_for(&self, category: &str) -> String {
        self.assign_by_category
            .get(category)
            .unwrap_or(&self.default_assignee)
            .clone()
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}

/// Expand a validated quote into its ordered task list.
///
/// Layout: site visit, procurement, one task per service (multi-day
/// services push the running due date forward before being recorded,
/// and a category change inserts one buffer day after a task), then
/// quality inspection and invoicing.
pub fn schedule_tasks(quote: &QuoteData, options: &SchedulerOptions) -> Vec<TaskRow> {
    let mut tasks = Vec::with_capacity(quote.services.len() + 4);
    let base_date = add_days(quote.created_at.date_naive(), options.buffer_days);

    tasks.push(TaskRow {
        job_id: quote.id.clone(),
        task: "Schedule site visit and confirm access".to_string(),
        assignee: options.default_assignee.clone(),
        status: TaskStatus::Pending,
        due: base_date,
        category: "Admin".to_string(),
        priority: TaskPriority::High,
        estimated_hours: 1.0,
        notes: Some(format!(
            "Client: {}, Property: {}",
            quote.client_name, quote.property.address
        )),
    });

    tasks.push(TaskRow {
        job_id: quote.id.clone(),
        task: "Procure materials and equipment".to_string(),
        assignee: options.default_assignee.clone(),
        status: TaskStatus::Pending,
        due: add_days(base_date, 1),
        category: "Procurement".to_string(),
        priority: TaskPriority::Medium,
        estimated_hours: 2.0,
        notes: Some(format!(
            "Total value: ${:.2} - Review services list for materials needed",
            quote.total
        )),
    });

    // Work starts after procurement.
    let mut current_due = add_days(base_date, 2);

    for (index, service) in quote.services.iter().enumerate() {
        let estimated_hours = estimate_hours(service);

        // Multi-day work pushes the date forward before being recorded.
        if estimated_hours > 8.0 {
            current_due = add_days(current_due, (estimated_hours / 8.0).ceil() as u64);
        }

        let notes = format!(
            "{} {} @ ${:.2} each. {}",
            service.quantity,
            service.unit,
            service.unit_price,
            service.notes.as_deref().unwrap_or("")
        );

        tasks.push(TaskRow {
            job_id: quote.id.clone(),
            task: service.description.clone(),
            assignee: options.assignee_for(&service.category),
            status: TaskStatus::Pending,
            due: current_due,
            category: service.category.clone(),
            priority: determine_priority(service),
            estimated_hours,
            notes: Some(notes.trim_end().to_string()),
        });

        // Buffer day between different work categories.
        if let Some(next) = quote.services.get(index + 1) {
            if next.category != service.category {
                current_due = add_days(current_due, 1);
            }
        }
    }

    let inspection_due = add_days(current_due, 1);

    tasks.push(TaskRow {
        job_id: quote.id.clone(),
        task: "Quality inspection and client walkthrough".to_string(),
        assignee: options.default_assignee.clone(),
        status: TaskStatus::Pending,
        due: inspection_due,
        category: "QA".to_string(),
        priority: TaskPriority::High,
        estimated_hours: 2.0,
        notes: Some("Final inspection with client before project completion".to_string()),
    });

    tasks.push(TaskRow {
        job_id: quote.id.clone(),
        task: "Invoice and payment collection".to_string(),
        assignee: "Accounts".to_string(),
        status: TaskStatus::Pending,
        due: add_days(inspection_due, 1),
        category: "Admin".to_string(),
        priority: TaskPriority::High,
        estimated_hours: 1.0,
        notes: Some(format!("Total amount: ${:.2}", quote.total)),
    });

    tasks
}
