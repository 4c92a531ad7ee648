//! Partner revenue-share helpers. The share is stored upstream as a fraction
//! of 1.0 but edited in the console as a percentage.

use serde_json::{json, Value};

pub fn share_from_percent(percent: f64) -> f64 {
    percent / 100.0
}

/// Redisplay value, rounded to one decimal place.
pub fn share_to_percent(share: f64) -> f64 {
    (share * 1000.0).round() / 10.0
}

/// Rewrites a `revenueSharePercent` field in a partner payload into the
/// stored `revenueShare` fraction before it is forwarded upstream. Payloads
/// that already carry a fraction pass through unchanged.
pub fn normalize_revenue_share(body: &mut Value) {
    let Some(object) = body.as_object_mut() else {
        return;
    };
    if let Some(percent) = object
        .remove("revenueSharePercent")
        .and_then(|value| value.as_f64())
    {
        object.insert(
            "revenueShare".to_string(),
            json!(share_from_percent(percent)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_recovers_percentage_within_a_tenth() {
        for percent in [0.0, 12.5, 33.3, 50.0, 99.9, 100.0] {
            let stored = share_from_percent(percent);
            assert!((share_to_percent(stored) - percent).abs() < 0.1);
        }
    }

    #[test]
    fn percent_field_becomes_stored_fraction() {
        let mut body = serde_json::json!({
            "partnerId": "acme",
            "revenueSharePercent": 17.5
        });
        normalize_revenue_share(&mut body);
        assert!(body.get("revenueSharePercent").is_none());
        assert_eq!(body["revenueShare"], serde_json::json!(0.175));
    }

    #[test]
    fn payload_without_percent_is_untouched() {
        let mut body = serde_json::json!({ "revenueShare": 0.4 });
        normalize_revenue_share(&mut body);
        assert_eq!(body["revenueShare"], serde_json::json!(0.4));
    }
}
