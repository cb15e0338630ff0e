use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::modules::analysis::model::VideoAnalysis;

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("fenced JSON pattern is valid")
});

/// Returns the JSON object inside a ```json fence, or the whole reply.
pub fn extract_json_text(reply: &str) -> &str {
    FENCED_OBJECT
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply)
}

/// Keys the analyzer stamps itself; whatever the model put there is discarded.
/// `raw_response` is reserved for the fallback document.
const STAMPED_KEYS: [&str; 4] = ["analyzed_at", "video_file", "video_size_mb", "raw_response"];

/// Best-effort parse of a model reply. Never fails: anything that is not a
/// JSON object of the expected shape becomes the fallback document.
pub fn parse_analysis(reply: &str) -> VideoAnalysis {
    let parsed = match serde_json::from_str::<Value>(extract_json_text(reply).trim()) {
        Ok(Value::Object(mut object)) => {
            for key in STAMPED_KEYS {
                object.remove(key);
            }
            Some(serde_json::from_value::<VideoAnalysis>(Value::Object(object)))
        }
        _ => None,
    };

    match parsed {
        Some(Ok(analysis)) => analysis,
        Some(Err(e)) => {
            log::warn!("Model JSON has an unexpected shape ({}), keeping raw text", e);
            VideoAnalysis::fallback(reply)
        }
        None => {
            log::warn!("Could not parse model reply as JSON, keeping raw text");
            VideoAnalysis::fallback(reply)
        }
    }
}
