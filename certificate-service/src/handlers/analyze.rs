use crate::dtos::AnalyzeRequest;
use crate::services::extraction::{extract_json_object, EXTRACTION_PROMPT};
use crate::services::providers::DocumentPart;
use crate::startup::AppState;
use anyhow::anyhow;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, response::IntoResponse, Json};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde_json::Value;
use service_core::error::AppError;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// `POST /analyze` — run the uploaded certificate through the model,
/// normalize the result and store it. The response is the record as it
/// existed before the database layer stamped `created_at`.
pub async fn analyze_certificate(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(anyhow!("invalid request body: {}", e)))?;

    let encoded = request
        .image
        .ok_or_else(|| AppError::BadRequest(anyhow!("missing field: image")))?;
    let mime_type = request
        .mime_type
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    let data = BASE64_STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| AppError::BadRequest(anyhow!("image is not valid base64: {}", e)))?;

    let document = DocumentPart { data, mime_type };

    let response = state
        .text_provider
        .generate(EXTRACTION_PROMPT, &document)
        .await
        .map_err(|e| AppError::UpstreamError(anyhow!(e)))?;

    tracing::debug!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Model call completed"
    );

    let text = response
        .text
        .ok_or_else(|| AppError::UpstreamError(anyhow!("model returned an empty response")))?;

    let mut record = extract_json_object(&text)?;

    // The extracted name is discarded on purpose: every record is stored
    // under the configured alias.
    record.insert(
        "athlete_name".to_string(),
        Value::String(state.config.privacy.athlete_alias.clone()),
    );

    state.db.insert_record(&record).await?;

    tracing::info!(
        event_name = record
            .get("event_name")
            .and_then(|v| v.as_str())
            .unwrap_or("-"),
        "Certificate analyzed and stored"
    );

    Ok(Json(Value::Object(record)))
}
