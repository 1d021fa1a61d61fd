//! Quote data model.
//!
//! These types mirror the JSON shape the generative model is asked to
//! produce, so they deserialize straight off the extracted response.
//! All wire forms are camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Broad classification of the property being quoted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Residential,
    Commercial,
    Industrial,
}

/// Overall condition as assessed during the walkthrough.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    NeedsRenovation,
}

/// Optional size measurements for a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySize {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
}

/// Property details extracted from the transcript.
///
/// Immutable once embedded in a quote; the validator only ever fills a
/// blank address with a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    #[serde(default)]
    pub address: String,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PropertySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u32>,
    pub condition: PropertyCondition,
}

/// One line of billable work within a quote.
///
/// `total_price` is a derived field: the validator always overwrites it
/// with `quantity * unit_price`, regardless of what the model supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    /// Unique within the parent quote. Generated when the model omits it.
    #[serde(default)]
    pub id: String,
    /// Free-text category, used as the routing key for task assignment.
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    /// Free-text unit label, e.g. "hours", "square meters", "item".
    pub unit: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Quote lifecycle state.
///
/// `Draft` is the initial state; `Accepted`, `Rejected` and `Expired`
/// are terminal for this pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

/// A priced, itemized quote derived from a walkthrough transcript.
///
/// Monetary fields (`subtotal`, `gst`, `total`, each service's
/// `total_price`) are never trusted from the model; the validator
/// recomputes them before a quote leaves the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub property: PropertyDetails,
    /// Ordered; insertion order drives task scheduling.
    pub services: Vec<ServiceItem>,
    pub subtotal: f64,
    pub gst: f64,
    pub total: f64,
    pub valid_until: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: QuoteStatus,
}

/// Caller input for quote generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_item_deserializes_camel_case() {
        let json = r#"{
            "category": "Electrical",
            "description": "Replace switchboard",
            "quantity": 1,
            "unit": "item",
            "unitPrice": 1100,
            "totalPrice": 1100
        }"#;
        let item: ServiceItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit_price, 1100.0);
        assert!(item.id.is_empty());
    }

    #[test]
    fn condition_uses_snake_case() {
        let c: PropertyCondition = serde_json::from_str("\"needs_renovation\"").unwrap();
        assert_eq!(c, PropertyCondition::NeedsRenovation);
    }

    #[test]
    fn quote_status_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&QuoteStatus::Draft).unwrap(), "\"draft\"");
    }
}
