//! Monetary invariant enforcement for quotes.
//!
//! This is the single source of truth for a quote's figures. Model
//! output is untrusted: every derived number is recomputed here, and
//! wrong values are corrected rather than rejected. The only hard
//! failure is a quote with no line items.

use super::{QuoteData, QuoteError, QuoteResult};

/// Placeholder used when the model could not extract an address.
pub const ADDRESS_PLACEHOLDER: &str = "Address to be confirmed";

/// GST rate applied to the subtotal (Australian consumption tax).
pub const GST_RATE: f64 = 0.10;

/// Round a currency amount to two decimal places.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Recompute and enforce the monetary invariants on a quote, in place.
///
/// For every service, `total_price` is overwritten with
/// `quantity * unit_price`; the corrected totals are summed into
/// `subtotal`, and `gst`/`total` are derived from that. A blank
/// property address is substituted with [`ADDRESS_PLACEHOLDER`].
///
/// Fails with [`QuoteError::EmptyQuote`] when the quote has no services.
pub fn validate_and_recalculate(quote: &mut QuoteData) -> QuoteResult<()> {
    if quote.services.is_empty() {
        return Err(QuoteError::EmptyQuote);
    }

    let mut subtotal = 0.0;
    for service in &mut quote.services {
        service.total_price = service.quantity * service.unit_price;
        subtotal += service.total_price;
    }

    quote.subtotal = subtotal;
    quote.gst = round_currency(subtotal * GST_RATE);
    quote.total = quote.subtotal + quote.gst;

    if quote.property.address.trim().is_empty() {
        quote.property.address = ADDRESS_PLACEHOLDER.to_string();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::*;
    use chrono::Utc;

    fn service(quantity: f64, unit_price: f64, total_price: f64) -> ServiceItem {
        ServiceItem {
            id: "S-TEST".to_string(),
            category: "General".to_string(),
            description: "Work".to_string(),
            quantity,
            unit: "item".to_string(),
            unit_price,
            total_price,
            notes: None,
        }
    }

    fn quote(services: Vec<ServiceItem>) -> QuoteData {
        QuoteData {
            id: "Q-TEST".to_string(),
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
            services,
            subtotal: 0.0,
            gst: 0.0,
            total: 0.0,
            valid_until: Utc::now().date_naive(),
            notes: None,
            created_at: Utc::now(),
            status: QuoteStatus::Draft,
        }
    }

    #[test]
    fn recomputes_totals_from_untrusted_input() {
        // Model-supplied totals are deliberately wrong.
        let mut q = quote(vec![service(2.0, 150.0, 999.0), service(1.0, 1100.0, 0.0)]);
        validate_and_recalculate(&mut q).unwrap();

        assert_eq!(q.services[0].total_price, 300.0);
        assert_eq!(q.services[1].total_price, 1100.0);
        assert_eq!(q.subtotal, 1400.0);
        assert_eq!(q.gst, 140.0);
        assert_eq!(q.total, 1540.0);
    }

    #[test]
    fn gst_rounds_to_two_decimals() {
        let mut q = quote(vec![service(1.0, 33.33, 0.0)]);
        validate_and_recalculate(&mut q).unwrap();
        assert_eq!(q.subtotal, 33.33);
        assert_eq!(q.gst, 3.33);
        assert_eq!(q.total, 36.66);
    }

    #[test]
    fn empty_services_is_a_hard_failure() {
        let mut q = quote(vec![]);
        let err = validate_and_recalculate(&mut q).unwrap_err();
        assert!(matches!(err, QuoteError::EmptyQuote));
    }

    #[test]
    fn blank_address_gets_placeholder() {
        let mut q = quote(vec![service(1.0, 100.0, 100.0)]);
        q.property.address = "   ".to_string();
        validate_and_recalculate(&mut q).unwrap();
        assert_eq!(q.property.address, ADDRESS_PLACEHOLDER);
    }
}
