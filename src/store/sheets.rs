//! Google Sheets task store.
//!
//! Talks to the Sheets REST API directly with a service-account
//! bearer token (RS256 JWT exchanged for an access token, cached until
//! shortly before expiry). The sheet is the shared task board: nine
//! columns, header row first.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::TaskStore;
use crate::tasks::{TaskPriority, TaskRow, TaskStatus};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Refresh the cached token this long before it actually expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Which spreadsheet and range hold the task board.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub range: String,
    pub headers: Vec<String>,
}

impl SheetConfig {
    /// The standard nine-column task board layout.
    pub fn new(sheet_id: String) -> Self {
        Self {
            sheet_id,
            range: "Tasks!A:I".to_string(),
            headers: [
                "JobId", "Task", "Assignee", "Status", "Due", "Category", "Priority",
                "EstimatedHours", "Notes",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Service-account JWT claims for the OAuth assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Rows as the Sheets values API sends and receives them.
#[derive(Debug, Serialize)]
struct ValuesBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Encode a task row into the nine sheet columns.
fn row_values(task: &TaskRow) -> Vec<String> {
    vec![
        task.job_id.clone(),
        task.task.clone(),
        task.assignee.clone(),
        task.status.as_str().to_string(),
        task.due.format("%Y-%m-%d").to_string(),
        task.category.clone(),
        task.priority.as_str().to_string(),
        task.estimated_hours.to_string(),
        task.notes.clone().unwrap_or_default(),
    ]
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Decode a sheet row back into a task row, tolerating missing or
/// malformed cells the way the board tolerates hand edits.
fn task_from_row(row: &[String]) -> TaskRow {
    TaskRow {
        job_id: cell(row, 0).to_string(),
        task: cell(row, 1).to_string(),
        assignee: cell(row, 2).to_string(),
        status: TaskStatus::parse_or_default(cell(row, 3)),
        due: NaiveDate::parse_from_str(cell(row, 4), "%Y-%m-%d").unwrap_or_default(),
        category: cell(row, 5).to_string(),
        priority: TaskPriority::parse_or_default(cell(row, 6)),
        estimated_hours: cell(row, 7).parse().unwrap_or(0.0),
        notes: match cell(row, 8) {
            "" => None,
            notes => Some(notes.to_string()),
        },
    }
}

/// Google Sheets client implementing [`TaskStore`].
pub struct SheetsTaskStore {
    client: Client,
    config: SheetConfig,
    service_account_email: String,
    private_key: EncodingKey,
    token: RwLock<Option<CachedToken>>,
}

impl SheetsTaskStore {
    /// Create a store for the given sheet.
    ///
    /// `private_key` is the service account's PEM-encoded RSA key.
    pub fn new(
        config: SheetConfig,
        service_account_email: String,
        private_key: &str,
    ) -> anyhow::Result<Self> {
        let private_key = EncodingKey::from_rsa_pem(private_key.as_bytes())?;
        Ok(Self {
            client: Client::new(),
            config,
            service_account_email,
            private_key,
            token: RwLock::new(None),
        })
    }

    /// Get a bearer token, exchanging a fresh JWT assertion when the
    /// cached one is absent or near expiry.
    async fn access_token(&self) -> anyhow::Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(t) = cached.as_ref() {
                if t.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                    return Ok(t.token.clone());
                }
            }
        }

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.private_key)?;

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            anyhow::bail!("Token exchange failed: {} - {}", status, text);
        }

        let parsed: TokenResponse = serde_json::from_str(&text)?;
        let token = parsed.access_token.clone();
        *self.token.write().await = Some(CachedToken {
            token: parsed.access_token,
            expires_at: Instant::now() + Duration::from_secs(parsed.expires_in),
        });

        Ok(token)
    }

    fn values_url(&self, range: &str) -> String {
        format!("{}/{}/values/{}", SHEETS_API_URL, self.config.sheet_id, range)
    }

    /// Write the header row if the sheet is still empty.
    async fn ensure_headers(&self, token: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .get(self.values_url("Tasks!A1:I1"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            anyhow::bail!("Failed to read sheet headers: {} - {}", status, text);
        }

        let existing: ValuesResponse = serde_json::from_str(&text)?;
        if !existing.values.is_empty() {
            return Ok(());
        }

        let body = ValuesBody {
            values: vec![self.config.headers.clone()],
        };
        let resp = self
            .client
            .put(format!(
                "{}?valueInputOption=RAW",
                self.values_url("Tasks!A1:I1")
            ))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            anyhow::bail!("Failed to initialize sheet headers: {}", text);
        }

        tracing::info!("Initialized task sheet with headers");
        Ok(())
    }

    /// Update the status cell (column D) of the first row matching a
    /// job id.
    pub async fn update_task_status(
        &self,
        job_id: &str,
        new_status: TaskStatus,
    ) -> anyhow::Result<()> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(self.values_url(&self.config.range))
            .bearer_auth(&token)
            .send()
            .await?;
        let rows: ValuesResponse = resp.json().await?;

        // Row 0 is the header; sheet row numbers are 1-based.
        let row_index = rows
            .values
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| cell(row, 0) == job_id)
            .map(|(i, _)| i)
            .ok_or_else(|| anyhow::anyhow!("Task with jobId {} not found", job_id))?;

        let range = format!("Tasks!D{row}:D{row}", row = row_index + 1);
        let body = ValuesBody {
            values: vec![vec![new_status.as_str().to_string()]],
        };
        let resp = self
            .client
            .put(format!(
                "{}?valueInputOption=RAW",
                self.values_url(&range)
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let text = resp.text().await?;
            anyhow::bail!("Failed to update task status: {}", text);
        }

        tracing::info!("Updated task {} status to {}", job_id, new_status.as_str());
        Ok(())
    }
}

#[async_trait]
impl TaskStore for SheetsTaskStore {
    async fn append_tasks(&self, tasks: &[TaskRow]) -> anyhow::Result<()> {
        let token = self.access_token().await?;
        self.ensure_headers(&token).await?;

        let body = ValuesBody {
            values: tasks.iter().map(row_values).collect(),
        };

        let resp = self
            .client
            .post(format!(
                "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
                self.values_url(&self.config.range)
            ))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await?;
            anyhow::bail!("Failed to append tasks to sheet: {} - {}", status, text);
        }

        tracing::info!("Added {} tasks to sheet", tasks.len());
        Ok(())
    }

    async fn fetch_tasks(&self) -> anyhow::Result<Vec<TaskRow>> {
        let token = self.access_token().await?;

        let resp = self
            .client
            .get(self.values_url(&self.config.range))
            .bearer_auth(&token)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            anyhow::bail!("Failed to read tasks from sheet: {} - {}", status, text);
        }

        let rows: ValuesResponse = serde_json::from_str(&text)?;
        if rows.values.len() <= 1 {
            return Ok(Vec::new());
        }

        Ok(rows.values[1..].iter().map(|r| task_from_row(r)).collect())
    }
}
