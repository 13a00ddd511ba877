use crate::dtos::HistoryParams;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use mongodb::bson::Document;
use serde_json::Value;
use service_core::error::AppError;

/// `GET /history` — every stored record for one athlete name, newest
/// first. With no `name` parameter the configured alias is looked up,
/// which in a stock deployment is the only name ever written.
pub async fn record_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let raw_name = params
        .name
        .unwrap_or_else(|| state.config.privacy.athlete_alias.clone());
    let name = normalize_name(&raw_name);

    let documents = state.db.find_by_athlete(&name).await?;

    let mut history = documents
        .into_iter()
        .map(record_to_response)
        .collect::<Result<Vec<Value>, AppError>>()?;

    // Lexicographic sort on the textual timestamp, newest first; records
    // without a timestamp compare as "" and land at the end.
    history.sort_by(|a, b| {
        let a_key = a.get("created_at").and_then(Value::as_str).unwrap_or("");
        let b_key = b.get("created_at").and_then(Value::as_str).unwrap_or("");
        b_key.cmp(a_key)
    });

    tracing::debug!(name = %name, records = history.len(), "History query completed");

    Ok(Json(history))
}

/// Strip ordinary and full-width spaces so a name entered with spacing
/// variants still matches the stored value.
pub fn normalize_name(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ' && *c != '　').collect()
}

/// Response shape of a stored record: the Mongo id is dropped and a
/// `created_at` datetime is rendered as an RFC 3339 string. Records that
/// never had the field keep it absent.
fn record_to_response(mut document: Document) -> Result<Value, AppError> {
    let created_at = document
        .get_datetime("created_at")
        .ok()
        .map(|dt| dt.to_chrono().to_rfc3339());
    if created_at.is_some() {
        document.remove("created_at");
    }

    document.remove("_id");

    let mut value = serde_json::to_value(&document).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("failed to serialize record: {}", e))
    })?;

    if let (Some(created_at), Some(map)) = (created_at, value.as_object_mut()) {
        map.insert("created_at".to_string(), Value::String(created_at));
    }

    Ok(value)
}
