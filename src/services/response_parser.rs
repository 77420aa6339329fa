use serde_json::Value;
use tracing::debug;

use crate::error::{PlanningError, Result};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";
const EXCERPT_CHARS: usize = 200;

/// Remove markdown code fences when the completion starts with a ```json block.
///
/// Text that does not start with the fence is returned unchanged.
pub fn strip_code_fence(content: &str) -> String {
    if content.starts_with(JSON_FENCE) {
        content
            .replace(JSON_FENCE, "")
            .replace(FENCE, "")
            .trim()
            .to_string()
    } else {
        content.to_string()
    }
}

/// Decode a completion into a JSON itinerary payload.
///
/// The decoded value is passed through as-is; no structural checks happen here.
pub fn parse_itinerary_response(content: &str) -> Result<Value> {
    let cleaned = strip_code_fence(content);

    serde_json::from_str::<Value>(&cleaned).map_err(|source| {
        debug!(
            target: "planning::parser",
            error = %source,
            response = %cleaned,
            "completion is not valid JSON"
        );
        PlanningError::Parse {
            raw_response: excerpt(&cleaned),
            source,
        }
    })
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}
