//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::AnthropicClient;
use crate::project::{project_status, ProjectOrchestrator};
use crate::quote::{QuoteError, QuoteRequest, RetryingQuoteGenerator};
use crate::store::{SheetConfig, SheetsTaskStore, TaskStore};
use crate::tasks::SchedulerOptions;

use super::types::*;

/// Minimum transcript length a generation request must carry; anything
/// shorter cannot describe a walkthrough.
const MIN_TRANSCRIPT_LEN: usize = 50;

/// Shared application state.
pub struct AppState {
    pub generator: RetryingQuoteGenerator,
    pub store: Arc<dyn TaskStore>,
    pub orchestrator: ProjectOrchestrator,
}

impl AppState {
    pub fn new(generator: RetryingQuoteGenerator, store: Arc<dyn TaskStore>) -> Self {
        let orchestrator = ProjectOrchestrator::new(Arc::clone(&store));
        Self {
            generator,
            store,
            orchestrator,
        }
    }
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let llm = Arc::new(AnthropicClient::new(
        config.anthropic_api_key.clone(),
        config.quote_model.clone(),
    ));
    let store: Arc<dyn TaskStore> = Arc::new(SheetsTaskStore::new(
        SheetConfig::new(config.google_sheet_id.clone()),
        config.google_service_account_email.clone(),
        &config.google_private_key,
    )?);

    let state = Arc::new(AppState::new(RetryingQuoteGenerator::new(llm), store));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/quote/generate", post(generate_quote))
        .route("/api/project", post(create_project))
        .route("/api/project/:job_id/status", get(get_project_status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Generate a quote from a walkthrough transcript.
async fn generate_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateQuoteRequest>,
) -> Result<Json<GenerateQuoteResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.transcript.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "transcript is required"));
    }
    if req.transcript.len() < MIN_TRANSCRIPT_LEN {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Transcript too short. Please provide a more detailed property walkthrough.",
        ));
    }

    tracing::info!(
        "Generating quote. Transcript length: {} characters",
        req.transcript.len()
    );

    // A caller-supplied property address travels with the free-text
    // context rather than as its own field.
    let additional_notes = {
        let mut parts = Vec::new();
        if let Some(notes) = &req.additional_notes {
            parts.push(notes.clone());
        }
        if let Some(address) = &req.property_address {
            parts.push(format!("Property address: {}", address));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    };

    let quote = state
        .generator
        .generate(&QuoteRequest {
            transcript: req.transcript,
            client_name: req.client_name,
            client_email: req.client_email,
            additional_notes,
        })
        .await
        .map_err(quote_error_response)?;

    tracing::info!("Quote generated successfully: {}, Total: ${:.2}", quote.id, quote.total);

    Ok(Json(GenerateQuoteResponse {
        success: true,
        quote,
    }))
}

fn quote_error_response(err: QuoteError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        QuoteError::EmptyQuote => StatusCode::UNPROCESSABLE_ENTITY,
        QuoteError::Exhausted { source, .. } if matches!(**source, QuoteError::EmptyQuote) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::BAD_GATEWAY,
    };
    tracing::error!("Quote generation failed: {}", err);
    error(status, format!("Failed to generate quote: {}", err))
}

/// Create a project (scheduled task batch) from an accepted quote.
async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.quote.id.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "quote id is required"));
    }

    let options = SchedulerOptions::default().with_overrides(req.options.unwrap_or_default());
    let outcome = state
        .orchestrator
        .create_project(&req.quote, &options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create project from quote {}: {}", req.quote.id, e);
            error(StatusCode::BAD_GATEWAY, format!("{}", e))
        })?;

    Ok(Json(CreateProjectResponse {
        success: true,
        tasks_created: outcome.tasks_created,
        summary: outcome.summary,
    }))
}

/// Aggregate status over a project's task rows.
async fn get_project_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<ProjectStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let all_tasks = state.store.fetch_tasks().await.map_err(|e| {
        tracing::error!("Failed to fetch tasks: {}", e);
        error(StatusCode::BAD_GATEWAY, format!("Failed to fetch tasks: {}", e))
    })?;

    let tasks: Vec<_> = all_tasks
        .into_iter()
        .filter(|t| t.job_id == job_id)
        .collect();

    Ok(Json(ProjectStatusResponse {
        job_id,
        report: project_status(&tasks),
    }))
}
