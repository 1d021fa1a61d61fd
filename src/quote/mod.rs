//! Quote generation pipeline.
//!
//! A walkthrough transcript goes in, a validated [`QuoteData`] comes
//! out: the generator asks the language model for a structured quote,
//! the validator enforces the monetary invariants, and the retrying
//! wrapper absorbs the flakiness of generative calls.

pub mod generation;
pub mod types;
pub mod validation;

pub use generation::{QuoteGenerator, RetryPolicy, RetryingQuoteGenerator};
pub use types::{
    PropertyCondition, PropertyDetails, PropertySize, PropertyType, QuoteData, QuoteRequest,
    QuoteStatus, ServiceItem,
};
pub use validation::validate_and_recalculate;

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from the quote generation pipeline.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The generative call itself failed.
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    /// The model response contained no balanced JSON object.
    #[error("could not extract a JSON object from the model response")]
    MissingJson,

    /// The extracted JSON did not match the expected quote shape.
    #[error("model output did not match the expected quote shape: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// No services were identified from the transcript. A quote with no
    /// line items is unusable downstream, so this is a business failure
    /// rather than a transient one.
    #[error("no services identified from transcript")]
    EmptyQuote,

    /// Every retry attempt failed; carries the last underlying cause.
    #[error("quote generation failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<QuoteError>,
    },
}

pub type QuoteResult<T> = Result<T, QuoteError>;
