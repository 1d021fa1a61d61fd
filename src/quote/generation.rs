//! Quote generation from walkthrough transcripts.
//!
//! [`QuoteGenerator`] makes a single structured-output request to the
//! language model; [`RetryingQuoteGenerator`] wraps it with bounded
//! retry and exponential backoff. Generative calls are treated as
//! inherently flaky, so all failure kinds are retried alike up to the
//! attempt cap.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use serde::Deserialize;

use super::types::{PropertyDetails, QuoteData, QuoteRequest, QuoteStatus, ServiceItem};
use super::validation::validate_and_recalculate;
use super::{QuoteError, QuoteResult};
use crate::llm::LlmClient;

/// Days a freshly generated quote stays valid when the model does not
/// supply its own expiry date.
const VALIDITY_DAYS: u64 = 30;

/// System instruction for the quote extraction call.
const QUOTE_SYSTEM_PROMPT: &str = r#"
You are an expert building and property maintenance professional. You will analyze property walkthrough transcripts and generate detailed, accurate quotes for maintenance and repair work.

Your task is to:
1. Extract property details from the transcript
2. Identify all work items mentioned
3. Categorize work by type (electrical, plumbing, painting, etc.)
4. Estimate quantities and pricing based on Australian market rates
5. Generate a professional quote structure

IMPORTANT PRICING GUIDELINES (Australian market, 2024):
- Labor rates: $80-120/hour for trades, $50-80/hour for general work
- Materials: Add 20-30% markup on cost price
- Consider property location for pricing adjustments
- Include GST (10%) in final calculations

Extract and structure the following information as JSON:

{
  "clientName": "string (if mentioned, otherwise 'Valued Customer')",
  "property": {
    "address": "string (extract from transcript)",
    "propertyType": "residential|commercial|industrial",
    "size": {
      "squareMeters": number (estimate if not specified),
      "bedrooms": number (if residential),
      "bathrooms": number (if mentioned),
      "floors": number
    },
    "yearBuilt": number (estimate if not specified),
    "condition": "excellent|good|fair|poor|needs_renovation"
  },
  "services": [
    {
      "category": "string (e.g., 'Electrical', 'Plumbing', 'Painting')",
      "description": "string (detailed description of work)",
      "quantity": number,
      "unit": "string (e.g., 'hours', 'square meters', 'linear meters', 'item')",
      "unitPrice": number (in AUD),
      "totalPrice": number (quantity * unitPrice),
      "notes": "string (any special considerations)"
    }
  ],
  "subtotal": number (sum of all totalPrice),
  "gst": number (subtotal * 0.1),
  "total": number (subtotal + gst),
  "notes": "string (any general notes or assumptions)",
  "validUntil": "string (30 days from now, ISO format)"
}

Be thorough but realistic. If something is unclear from the transcript, make reasonable assumptions and note them. Include appropriate safety margins in pricing.
"#;

/// The subset of the model's JSON output that is trusted as input.
///
/// Monetary totals are deliberately absent; the validator recomputes
/// them, so whatever the model said is never read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelQuote {
    #[serde(default)]
    client_name: Option<String>,
    property: PropertyDetails,
    services: Vec<ServiceItem>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    valid_until: Option<String>,
}

/// Extract the first balanced `{...}` span from free text.
///
/// Tracks string and escape state so braces inside string literals do
/// not affect nesting depth. Returns `None` when no balanced object is
/// found, which callers surface as a format error rather than guessing.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn random_base36(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn base36(mut n: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 alphabet is ASCII")
}

/// Generate a quote id: `Q-<base36 millis>-<random>`, uppercased.
fn new_quote_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("Q-{}-{}", base36(millis), random_base36(6)).to_uppercase()
}

/// Generate a service id: `S-<random>`, uppercased.
fn new_service_id() -> String {
    format!("S-{}", random_base36(8)).to_uppercase()
}

/// Parse the model-supplied validity date, tolerating a full ISO
/// timestamp by reading only the date prefix.
fn parse_valid_until(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Orchestrates a single quote generation request.
pub struct QuoteGenerator {
    llm: Arc<dyn LlmClient>,
}

impl QuoteGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Build the user message embedding the transcript and any supplied
    /// client context.
    fn user_message(request: &QuoteRequest) -> String {
        format!(
            "Transcript of property walkthrough:\n\"{}\"\n\n\
             Additional information:\n\
             - Client name: {}\n\
             - Client email: {}\n\
             - Additional notes: {}\n\n\
             Please generate a detailed quote based on this information.",
            request.transcript,
            request.client_name.as_deref().unwrap_or("Not specified"),
            request.client_email.as_deref().unwrap_or("Not specified"),
            request.additional_notes.as_deref().unwrap_or("None"),
        )
    }

    /// Generate a validated quote from a transcript.
    ///
    /// Assigns a fresh quote id and per-service ids, fills defaulted
    /// fields, then runs the monetary validator before returning.
    pub async fn generate(&self, request: &QuoteRequest) -> QuoteResult<QuoteData> {
        tracing::info!("Generating quote from transcript...");

        let response = self
            .llm
            .complete(QUOTE_SYSTEM_PROMPT, &Self::user_message(request))
            .await?;

        let json = extract_json_object(&response).ok_or(QuoteError::MissingJson)?;
        let parsed: ModelQuote = serde_json::from_str(json)?;

        let created_at = Utc::now();
        let valid_until = parsed
            .valid_until
            .as_deref()
            .and_then(parse_valid_until)
            .unwrap_or_else(|| {
                created_at
                    .date_naive()
                    .checked_add_days(Days::new(VALIDITY_DAYS))
                    .unwrap_or_else(|| created_at.date_naive())
            });

        let services = parsed
            .services
            .into_iter()
            .map(|mut service| {
                if service.id.is_empty() {
                    service.id = new_service_id();
                }
                service
            })
            .collect();

        let mut quote = QuoteData {
            id: new_quote_id(),
            client_name: request
                .client_name
                .clone()
                .or(parsed.client_name)
                .unwrap_or_else(|| "Valued Customer".to_string()),
            client_email: request.client_email.clone().unwrap_or_default(),
            client_phone: None,
            property: parsed.property,
            services,
            subtotal: 0.0,
            gst: 0.0,
            total: 0.0,
            valid_until,
            notes: parsed.notes,
            created_at,
            status: QuoteStatus::Draft,
        };

        validate_and_recalculate(&mut quote)?;

        tracing::info!(
            "Quote {} generated successfully. Total: ${:.2}",
            quote.id,
            quote.total
        );
        Ok(quote)
    }
}

/// Retry schedule for quote generation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base unit for backoff; the delay after attempt `n` is
    /// `2^n * backoff_unit`. Tests shrink this to run instantly.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff_unit * 2u32.saturating_pow(attempt)
    }
}

/// [`QuoteGenerator`] wrapped with bounded retry and exponential
/// backoff.
///
/// Retries are strictly sequential; the backoff sleep is a cooperative
/// delay between attempts, never a background task.
pub struct RetryingQuoteGenerator {
    inner: QuoteGenerator,
    policy: RetryPolicy,
}

impl RetryingQuoteGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self::with_policy(llm, RetryPolicy::default())
    }

    pub fn with_policy(llm: Arc<dyn LlmClient>, policy: RetryPolicy) -> Self {
        Self {
            inner: QuoteGenerator::new(llm),
            policy,
        }
    }

    /// Generate a quote, retrying on any failure up to the attempt cap.
    ///
    /// After the cap is exhausted the last observed error is returned
    /// wrapped in [`QuoteError::Exhausted`].
    pub async fn generate(&self, request: &QuoteRequest) -> QuoteResult<QuoteData> {
        let max = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max {
            tracing::info!("Quote generation attempt {}/{}", attempt, max);
            match self.inner.generate(request).await {
                Ok(quote) => return Ok(quote),
                Err(error) => {
                    tracing::warn!("Quote generation attempt {} failed: {}", attempt, error);
                    last_error = Some(error);
                    if attempt < max {
                        let delay = self.policy.delay(attempt);
                        tracing::info!("Retrying in {:?}...", delay);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(QuoteError::Exhausted {
            attempts: max,
            source: Box::new(last_error.expect("at least one attempt was made")),
        })
    }
}
