//! Request types for the HTTP surface.
//!
//! Responses are raw JSON objects mirroring whatever the model produced,
//! so only the inbound shapes are typed.

use serde::Deserialize;

/// Body of `POST /analyze`. `image` is required but modeled as an option
/// so that its absence surfaces through the service's own error envelope
/// rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub image: Option<String>,
    pub mime_type: Option<String>,
}

/// Query parameters of `GET /history`.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub name: Option<String>,
}
