//! # sitequote
//!
//! Turns an unstructured spoken description of a property job into a
//! priced, itemized quote and a scheduled, assigned task breakdown.
//!
//! ## Pipeline
//!
//! ```text
//! transcript ──► RetryingQuoteGenerator ──► validated QuoteData
//!                                                │ (on acceptance)
//!                                                ▼
//!                     ProjectOrchestrator ──► TaskScheduler ──► task rows
//!                                                │
//!                                                ▼
//!                                           task store (sheet)
//!
//! fetched task rows ──► project_status ──► status summary
//! ```
//!
//! The generative model and the task sheet are external collaborators
//! behind the [`llm::LlmClient`] and [`store::TaskStore`] traits; the
//! monetary figures on every quote are recomputed by the validator
//! before anything downstream sees them.
//!
//! ## Modules
//! - `quote`: generation, validation, and the quote data model
//! - `tasks`: labor estimation and task scheduling
//! - `project`: project creation and status aggregation
//! - `store`: task persistence (Google Sheets)
//! - `llm`: generative-text client
//! - `api`: HTTP surface

pub mod api;
pub mod config;
pub mod llm;
pub mod project;
pub mod quote;
pub mod store;
pub mod tasks;

pub use config::Config;
