//! Database operations for the certificate service.
//!
//! Certificate records are schemaless by design: whatever object the model
//! produced is stored as-is, so the collection holds raw BSON documents
//! rather than a typed model.

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    Client as MongoClient, Collection, Database,
};
use serde_json::{Map, Value};
use service_core::error::AppError;

const RECORDS_COLLECTION: &str = "marathon_records";

#[derive(Clone)]
pub struct RecordsDb {
    client: MongoClient,
    db: Database,
}

impl RecordsDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn records(&self) -> Collection<Document> {
        self.db.collection(RECORDS_COLLECTION)
    }

    /// Insert an extracted record, stamping `created_at` with the database
    /// layer's clock at write time. The caller's copy stays unstamped.
    pub async fn insert_record(&self, record: &Map<String, Value>) -> Result<(), AppError> {
        let mut document = mongodb::bson::to_document(record).map_err(|e| {
            tracing::error!("Failed to convert record to BSON: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        document.insert("created_at", BsonDateTime::now());

        self.records()
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert certificate record: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// All records whose `athlete_name` equals `name` exactly, in cursor
    /// order. Sorting happens on the caller's side.
    pub async fn find_by_athlete(&self, name: &str) -> Result<Vec<Document>, AppError> {
        let mut cursor = self
            .records()
            .find(doc! { "athlete_name": name }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to query certificate records: {}", e);
                AppError::from(e)
            })?;

        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(|e| {
            tracing::error!("Failed to read certificate record from cursor: {}", e);
            AppError::from(e)
        })? {
            records.push(document);
        }
        Ok(records)
    }
}
