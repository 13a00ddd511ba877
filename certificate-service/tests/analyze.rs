//! Integration tests for the certificate analyzer endpoint.
//!
//! Run with: cargo test -p certificate-service --test analyze

mod common;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use certificate_service::services::providers::mock::MockTextProvider;
use common::{spawn_app, unique_alias};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const MODEL_REPLY: &str = r#"```json
{
  "athlete_name": "山田 太郎",
  "event_name": "Tokyo Marathon",
  "event_date": "2024/03/03",
  "time": "3:45:12",
  "course_features": "Flat city course on wide boulevards with dense crowd support.",
  "weather_info": "Cloudy, around 8°C with a light northerly wind."
}
```"#;

fn certificate_payload() -> serde_json::Value {
    json!({
        "image": BASE64_STANDARD.encode(b"fake certificate bytes"),
        "mime_type": "image/png",
    })
}

#[tokio::test]
async fn analyze_replaces_athlete_name_with_alias() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(Arc::new(MockTextProvider::with_reply(MODEL_REPLY)), &alias).await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/analyze", app.port))
        .json(&certificate_payload())
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["athlete_name"], alias.as_str());
    assert_eq!(body["event_name"], "Tokyo Marathon");
    assert_eq!(body["time"], "3:45:12");
    // The response is the pre-stamp record
    assert!(body.get("created_at").is_none());

    // The stored copy got the database layer's timestamp
    let stored = app.db.find_by_athlete(&alias).await.expect("query failed");
    assert_eq!(stored.len(), 1);
    assert!(stored[0].get_datetime("created_at").is_ok());
}

#[tokio::test]
async fn analyze_with_unparsable_model_output_stores_nothing() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(
        Arc::new(MockTextProvider::with_reply(
            "The image is too blurry to read.",
        )),
        &alias,
    )
    .await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/analyze", app.port))
        .json(&certificate_payload())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("not valid JSON"));

    let stored = app.db.find_by_athlete(&alias).await.expect("query failed");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn analyze_with_failing_provider_returns_error_envelope() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(Arc::new(MockTextProvider::failing()), &alias).await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/analyze", app.port))
        .json(&certificate_payload())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn analyze_rejects_missing_image_field() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(Arc::new(MockTextProvider::with_reply(MODEL_REPLY)), &alias).await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/analyze", app.port))
        .json(&json!({ "mime_type": "image/png" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn analyze_rejects_undecodable_base64() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(Arc::new(MockTextProvider::with_reply(MODEL_REPLY)), &alias).await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/analyze", app.port))
        .json(&json!({ "image": "!!! not base64 !!!" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);

    let stored = app.db.find_by_athlete(&alias).await.expect("query failed");
    assert!(stored.is_empty());
}

#[tokio::test]
async fn concurrent_analyze_requests_store_independent_records() {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return;
    }

    let alias = unique_alias();
    let app = spawn_app(Arc::new(MockTextProvider::with_reply(MODEL_REPLY)), &alias).await;
    let client = Client::new();
    let url = format!("http://localhost:{}/analyze", app.port);

    let requests = (0..5).map(|_| {
        let client = client.clone();
        let url = url.clone();
        async move {
            client
                .post(&url)
                .json(&certificate_payload())
                .send()
                .await
                .expect("Failed to send request")
        }
    });

    let responses = futures::future::join_all(requests).await;
    for response in responses {
        assert!(response.status().is_success());
    }

    let stored = app.db.find_by_athlete(&alias).await.expect("query failed");
    assert_eq!(stored.len(), 5);
}
