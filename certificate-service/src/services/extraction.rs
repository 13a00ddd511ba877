//! Turning raw model output into a certificate record.
//!
//! The model is asked for bare JSON, but in practice replies arrive
//! wrapped in markdown fences or surrounded by prose, so the extractor
//! has to tolerate both.

use anyhow::anyhow;
use serde_json::{Map, Value};
use service_core::error::AppError;

/// Fixed instruction sent with every certificate upload.
pub const EXTRACTION_PROMPT: &str = r#"You are a professional marathon coach. Analyze the attached completion certificate (image or PDF) and output the following information as JSON.

Rules:
- If "course_features" or "weather_info" are not printed in the file, use everything you know about the race identified by "event_name" and "event_date" to infer the course profile and the weather conditions on the day, and fill them in concretely.
- Never answer with words like "unknown" or "no data available".
- Do not wrap the output in a markdown fence (```json or similar).

{
  "athlete_name": "runner's name",
  "event_name": "name of the event",
  "event_date": "date held (YYYY/MM/DD)",
  "time": "finishing time",
  "course_features": "detailed description of the course (elevation, surface, crowd support)",
  "weather_info": "weather, temperature and wind on the day"
}"#;

/// Pull a single JSON object out of a model reply.
///
/// Primary path: parse the substring from the first `{` to the last `}`
/// of the trimmed text, which survives fences, language tags and
/// surrounding prose. Fallback: the literal ```json prefix / ``` suffix
/// strip, kept for compatibility with the primary path's blind spots.
pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>, AppError> {
    let trimmed = raw.trim();

    let candidate = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => strip_fence(trimmed),
    };

    let parsed: Value = serde_json::from_str(candidate)
        .or_else(|_| serde_json::from_str(strip_fence(trimmed)))
        .map_err(|e| AppError::UpstreamError(anyhow!("model output is not valid JSON: {}", e)))?;

    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(AppError::UpstreamError(anyhow!(
            "model output is not a JSON object: {}",
            other
        ))),
    }
}

fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```json").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
