//! Product schema validation.
//!
//! Validation is advisory: results are cached and returned whether or not
//! they pass, and defects travel to the caller as plain messages.

use serde_json::Value;

/// Keys every product result must carry, in reporting order.
pub const REQUIRED_KEYS: [&str; 9] = [
    "product_name",
    "brand",
    "product_type",
    "confidence",
    "description",
    "key_ingredients",
    "features",
    "skin_types",
    "similar_products",
];

/// Accepted `confidence` values.
pub const CONFIDENCE_LEVELS: [&str; 3] = ["high", "medium", "low"];

/// Check a parsed model result against the product schema.
///
/// Returns one message per failed rule, in a fixed order; an empty list
/// means the result is valid. Never fails.
pub fn validate(result: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| result.get(key).is_none())
        .collect();
    if !missing.is_empty() {
        errors.push(format!("Missing keys: {}", missing.join(", ")));
    }

    if !is_non_empty_list(result.get("key_ingredients")) {
        errors.push("key_ingredients must be a non-empty list".to_string());
    }

    if !is_non_empty_list(result.get("similar_products")) {
        errors.push("similar_products must be a non-empty list".to_string());
    }

    let confidence = result.get("confidence");
    let confidence_ok = confidence
        .and_then(Value::as_str)
        .is_some_and(|c| CONFIDENCE_LEVELS.contains(&c));
    if !confidence_ok {
        errors.push(format!(
            "confidence must be high/medium/low, got: '{}'",
            display_value(confidence)
        ));
    }

    let has_recommended = result
        .get("skin_types")
        .and_then(Value::as_object)
        .is_some_and(|skin| skin.contains_key("recommended"));
    if !has_recommended {
        errors.push("skin_types must be a dict with 'recommended' key".to_string());
    }

    errors
}

fn is_non_empty_list(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

/// Strings print bare, anything else as JSON, absence as nothing.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
