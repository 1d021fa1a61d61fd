//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::project::{ProjectStatusReport, ProjectSummary};
use crate::quote::QuoteData;
use crate::tasks::SchedulerOverrides;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body for `POST /api/quote/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuoteRequest {
    pub transcript: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub property_address: Option<String>,
}

/// Response for `POST /api/quote/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateQuoteResponse {
    pub success: bool,
    pub quote: QuoteData,
}

/// Body for `POST /api/project`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub quote: QuoteData,
    /// Per-request scheduling overrides; also accepted under the
    /// legacy `assignmentOptions` key.
    #[serde(default, alias = "assignmentOptions")]
    pub options: Option<SchedulerOverrides>,
}

/// Response for `POST /api/project`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    pub success: bool,
    pub tasks_created: usize,
    pub summary: ProjectSummary,
}

/// Response for `GET /api/project/:job_id/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusResponse {
    pub job_id: String,
    #[serde(flatten)]
    pub report: ProjectStatusReport,
}

/// Uniform error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
