//! Lenient extraction of structured output from model text
//!
//! Models wrap JSON in prose and code fences. The structured part of a
//! response is the span from the first `[` to the last `]`; anything that does
//! not parse degrades to an empty list rather than failing the cycle.

use crate::model::{lenient_text, ContentPlan, ContentType, Platform, TrendDescriptor};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\s\S]*\]").expect("static regex is valid"));

/// Find the outermost JSON array span in free text
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY.find(text).map(|m| m.as_str())
}

/// Parse the array span into raw values, or an empty list
fn parse_array(text: &str, what: &str) -> Vec<Value> {
    let Some(span) = extract_json_array(text) else {
        tracing::debug!("No {} array found in model output", what);
        return Vec::new();
    };

    match serde_json::from_str::<Vec<Value>>(span) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!("{} parse error: {}", what, e);
            Vec::new()
        }
    }
}

/// Trend descriptors from model text; non-object elements are skipped
pub fn parse_trends(text: &str) -> Vec<TrendDescriptor> {
    parse_array(text, "Trend")
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect()
}

/// Content plans from model text; elements that are not plan-shaped are skipped
pub fn parse_plans(text: &str) -> Vec<ContentPlan> {
    parse_array(text, "Plan")
        .iter()
        .filter_map(plan_from_value)
        .collect()
}

/// Plan as the model emits it, before normalization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlan {
    #[serde(default, deserialize_with = "lenient_text")]
    platform: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    action: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    hook: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    caption: Option<String>,
    #[serde(default)]
    predicted_naturalness: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    audio_description: Option<String>,
}

/// Normalize one raw plan value
///
/// Only non-objects are rejected. Missing or odd-typed text fields become
/// empty, unknown platforms fall back to Instagram and unknown types to
/// Lifestyle.
pub fn plan_from_value(value: &Value) -> Option<ContentPlan> {
    let raw: RawPlan = serde_json::from_value(value.clone()).ok()?;

    let platform = raw.platform.unwrap_or_default();
    let content_type = raw.content_type.unwrap_or_default();

    Some(ContentPlan {
        platform: Platform::parse(&platform).unwrap_or(Platform::Instagram),
        content_type: ContentType::parse(&content_type).unwrap_or(ContentType::Lifestyle),
        location: raw.location.unwrap_or_default(),
        action: raw.action.unwrap_or_default(),
        hook: raw.hook.unwrap_or_default(),
        caption: raw.caption.unwrap_or_default(),
        predicted_naturalness: raw.predicted_naturalness.as_ref().and_then(naturalness),
        audio_description: raw.audio_description.filter(|s| !s.trim().is_empty()),
    })
}

/// Accepts 92, 92.4, "92" and "92%"; clamps to 0-100
fn naturalness(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_array_from_fenced_prose() {
        let text = "Here you go:\n```json\n[{\"a\": 1}, {\"b\": [2]}]\n```\nEnjoy!";
        assert_eq!(
            extract_json_array(text),
            Some("[{\"a\": 1}, {\"b\": [2]}]")
        );
        assert_eq!(extract_json_array("no structure here"), None);
    }

    #[test]
    fn malformed_trends_degrade_to_empty() {
        assert!(parse_trends("[{\"trendName\": \"unterminated\"").is_empty());
        assert!(parse_trends("[this is not json]").is_empty());
        assert!(parse_trends("").is_empty());
    }

    #[test]
    fn trends_skip_non_objects() {
        let text = r#"[{"trendName": "Ferry sunsets", "location": "Kadikoy"}, "stray", 4]"#;
        let trends = parse_trends(text);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].location.as_deref(), Some("Kadikoy"));
    }

    #[test]
    fn plans_are_normalized() {
        let text = r#"Plans:
        [
          {"platform": "Twitter", "type": "Landscape", "location": "Galata", "action": "dusk walk",
           "hook": "Golden hour", "caption": "Quiet city", "predictedNaturalness": "93%"},
          {"platform": "Friendster", "type": "Hologram", "hook": "Odd one", "caption": "",
           "predictedNaturalness": 140},
          {"platform": "TikTok", "type": "POV", "hook": "", "caption": ""}
        ]"#;

        let plans = parse_plans(text);
        assert_eq!(plans.len(), 3);

        assert_eq!(plans[0].platform, Platform::X);
        assert_eq!(plans[0].content_type, ContentType::Landscape);
        assert_eq!(plans[0].predicted_naturalness, Some(93));

        assert_eq!(plans[1].platform, Platform::Instagram);
        assert_eq!(plans[1].content_type, ContentType::Lifestyle);
        assert_eq!(plans[1].predicted_naturalness, Some(100));

        assert_eq!(plans[2].content_type, ContentType::Pov);
        assert!(plans[2].hook.is_empty());
    }

    #[test]
    fn missing_prediction_stays_none() {
        let plan = plan_from_value(&json!({
            "platform": "YouTube", "type": "Animal", "hook": "Street cat", "caption": "Meet him"
        }))
        .unwrap();
        assert_eq!(plan.predicted_naturalness, None);
        assert_eq!(plan.audio_description, None);
    }

    #[test]
    fn odd_field_types_keep_the_plan() {
        let text = r#"[{"platform": "X", "type": "Landscape", "location": null, "action": 7,
                        "hook": ["not", "text"], "caption": "c", "audioDescription": null}]"#;
        let plans = parse_plans(text);
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].platform, Platform::X);
        assert_eq!(plans[0].location, "");
        assert_eq!(plans[0].action, "7");
        assert_eq!(plans[0].hook, "");
        assert_eq!(plans[0].caption, "c");
        assert_eq!(plans[0].audio_description, None);
    }

    #[test]
    fn non_object_plans_are_skipped() {
        assert!(plan_from_value(&json!("just text")).is_none());
        assert!(plan_from_value(&json!(42)).is_none());
    }

    #[test]
    fn trends_with_odd_field_types_survive() {
        let text = r#"[{"trendName": "Ferry sunsets", "emotionalTone": 5, "context": null}]"#;
        let trends = parse_trends(text);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].emotional_tone.as_deref(), Some("5"));
        assert_eq!(trends[0].context, None);
    }
}
