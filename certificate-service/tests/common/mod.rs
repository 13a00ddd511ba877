//! Shared helpers for integration tests.
//!
//! These tests require MongoDB to be reachable at MONGODB_URI (defaulting
//! to localhost). Set SKIP_MONGO_TESTS to skip them.

use certificate_service::config::CertificateConfig;
use certificate_service::services::providers::TextProvider;
use certificate_service::services::RecordsDb;
use certificate_service::startup::Application;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct TestApp {
    pub port: u16,
    pub db: RecordsDb,
    pub alias: String,
}

/// A per-test athlete alias so tests sharing the test database never see
/// each other's records.
pub fn unique_alias() -> String {
    format!("常夏冬太郎-{}", Uuid::new_v4())
}

/// Spawn the application on a random port with the given model provider
/// and privacy alias.
pub async fn spawn_app(provider: Arc<dyn TextProvider>, alias: &str) -> TestApp {
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0"); // Random port
    if std::env::var("MONGODB_URI").is_err() {
        std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");
    }
    std::env::set_var("MONGODB_DATABASE", "marathon_test_db");
    std::env::set_var("GOOGLE_API_KEY", "test-api-key");

    let mut config = CertificateConfig::load().expect("Failed to load config");
    config.privacy.athlete_alias = alias.to_string();

    let app = Application::build_with_provider(config, provider)
        .await
        .expect("Failed to build application");

    let port = app.port();
    let db = app.db().clone();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestApp {
        port,
        db,
        alias: alias.to_string(),
    }
}
