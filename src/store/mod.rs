//! Task persistence.
//!
//! The core only ever appends task batches and reads rows back; status
//! transitions belong to whoever works the sheet. The trait keeps the
//! orchestrator and the status endpoint testable without a network.

mod sheets;

pub use sheets::{SheetConfig, SheetsTaskStore};

use async_trait::async_trait;

use crate::tasks::TaskRow;

/// Persistence collaborator for task rows.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Append an ordered batch of rows in a single write.
    async fn append_tasks(&self, tasks: &[TaskRow]) -> anyhow::Result<()>;

    /// Read every task row currently in the store.
    async fn fetch_tasks(&self) -> anyhow::Result<Vec<TaskRow>>;
}
