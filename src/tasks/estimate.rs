//! Labor-hour and priority estimation for service items.
//!
//! Pure functions; the unit vocabulary is an explicit table so new
//! units are a data change rather than a code change.

use super::TaskPriority;
use crate::quote::ServiceItem;

/// Hourly rate assumed when estimating labor from price alone.
const FALLBACK_HOURLY_RATE: f64 = 100.0;

/// Keywords whose presence in a description marks safety-critical work.
const SAFETY_KEYWORDS: &[&str] = &["electrical", "gas", "plumbing", "safety", "emergency"];

/// Keywords whose presence marks structural work.
const STRUCTURAL_KEYWORDS: &[&str] = &["structural", "foundation", "roof", "wall"];

/// Price above which work is bumped to medium priority.
const HIGH_VALUE_THRESHOLD: f64 = 1000.0;

/// How a unit label converts to labor hours.
#[derive(Debug, Clone, Copy)]
enum UnitRule {
    /// The quantity already is a number of hours.
    Direct,
    /// Hours per unit of quantity, rounded, minimum one hour.
    PerQuantity(f64),
    /// One hour per item, minimum one hour, no rounding.
    PerItem,
}

/// Known unit labels and their conversion rules.
const UNIT_TABLE: &[(&str, UnitRule)] = &[
    ("hours", UnitRule::Direct),
    ("square meters", UnitRule::PerQuantity(0.5)),
    ("sqm", UnitRule::PerQuantity(0.5)),
    ("linear meters", UnitRule::PerQuantity(0.25)),
    ("m", UnitRule::PerQuantity(0.25)),
    ("item", UnitRule::PerItem),
    ("items", UnitRule::PerItem),
];

/// Estimate the labor hours a service will take.
///
/// Services already measured in hours pass through unchanged; known
/// units convert via [`UNIT_TABLE`]; anything else falls back to the
/// total price at an assumed $100/hour effective rate.
pub fn estimate_hours(service: &ServiceItem) -> f64 {
    let rule = UNIT_TABLE
        .iter()
        .find(|(unit, _)| *unit == service.unit)
        .map(|(_, rule)| *rule);

    match rule {
        Some(UnitRule::Direct) => service.quantity,
        Some(UnitRule::PerQuantity(hours_per_unit)) => {
            (service.quantity * hours_per_unit).round().max(1.0)
        }
        Some(UnitRule::PerItem) => service.quantity.max(1.0),
        None => (service.total_price / FALLBACK_HOURLY_RATE).round().max(1.0),
    }
}

fn contains_any(description: &str, keywords: &[&str]) -> bool {
    let lowered = description.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

/// Determine a service's scheduling priority.
///
/// Rules are checked in fixed order and the first match wins:
/// safety-critical keywords, structural keywords, high-value work,
/// then low.
pub fn determine_priority(service: &ServiceItem) -> TaskPriority {
    if contains_any(&service.description, SAFETY_KEYWORDS) {
        return TaskPriority::High;
    }
    if contains_any(&service.description, STRUCTURAL_KEYWORDS) {
        return TaskPriority::Medium;
    }
    if service.total_price > HIGH_VALUE_THRESHOLD {
        return TaskPriority::Medium;
    }
    TaskPriority::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(unit: &str, quantity: f64, total_price: f64) -> ServiceItem {
        ServiceItem {
            id: "S-TEST".to_string(),
            category: "General".to_string(),
            description: "Work".to_string(),
            quantity,
            unit: unit.to_string(),
            unit_price: 0.0,
            total_price,
            notes: None,
        }
    }

    fn described(description: &str, total_price: f64) -> ServiceItem {
        ServiceItem {
            description: description.to_string(),
            ..service("item", 1.0, total_price)
        }
    }

    #[test]
    fn hours_pass_through_unchanged() {
        assert_eq!(estimate_hours(&service("hours", 6.0, 0.0)), 6.0);
        assert_eq!(estimate_hours(&service("hours", 2.5, 0.0)), 2.5);
    }

    #[test]
    fn square_meters_at_half_hour_each() {
        assert_eq!(estimate_hours(&service("square meters", 10.0, 0.0)), 5.0);
        assert_eq!(estimate_hours(&service("sqm", 1.0, 0.0)), 1.0);
    }

    #[test]
    fn linear_meters_at_quarter_hour_each() {
        assert_eq!(estimate_hours(&service("linear meters", 20.0, 0.0)), 5.0);
        // Rounds below one hour up to the minimum.
        assert_eq!(estimate_hours(&service("m", 1.0, 0.0)), 1.0);
    }

    #[test]
    fn items_take_an_hour_each() {
        assert_eq!(estimate_hours(&service("item", 3.0, 0.0)), 3.0);
        assert_eq!(estimate_hours(&service("items", 0.0, 0.0)), 1.0);
    }

    #[test]
    fn unknown_units_estimate_from_price() {
        // round(250/100) = 3 under round-half-up.
        assert_eq!(estimate_hours(&service("widgets", 1.0, 250.0)), 3.0);
        assert_eq!(estimate_hours(&service("widgets", 1.0, 40.0)), 1.0);
    }

    #[test]
    fn safety_keywords_win_regardless_of_price() {
        assert_eq!(
            determine_priority(&described("Fix electrical wiring", 50.0)),
            TaskPriority::High
        );
        assert_eq!(
            determine_priority(&described("Emergency gas leak repair", 5000.0)),
            TaskPriority::High
        );
    }

    #[test]
    fn structural_keywords_are_medium() {
        assert_eq!(
            determine_priority(&described("Patch roof flashing", 200.0)),
            TaskPriority::Medium
        );
    }

    #[test]
    fn price_rule_applies_only_without_keyword_match() {
        assert_eq!(
            determine_priority(&described("Paint fence", 1500.0)),
            TaskPriority::Medium
        );
        assert_eq!(
            determine_priority(&described("Paint fence", 200.0)),
            TaskPriority::Low
        );
    }
}
