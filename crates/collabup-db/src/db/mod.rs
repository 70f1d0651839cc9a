use async_trait::async_trait;
use serde_json::Value;

use crate::error::DbResult;
use crate::model::document::Document;

pub mod collections;
pub mod connection;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod schema;

pub use query::{Direction, DocumentQuery};

/// How `DocumentStore::set` treats an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole body.
    Replace,
    /// Shallow-merge top-level fields into the existing body.
    Merge,
}

/// A schemaless store of JSON objects grouped into named collections.
///
/// Every document body is a JSON object. Adapters reject anything else with
/// `DbError::InvalidDocument`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document, `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<Document>>;

    /// Inserts a document under a freshly generated id.
    async fn create(&self, collection: &str, data: Value) -> DbResult<Document>;

    /// Creates or overwrites a document under a caller-chosen id.
    async fn set(&self, collection: &str, id: &str, data: Value, mode: WriteMode)
    -> DbResult<()>;

    /// Merges `patch` into an existing document.
    ///
    /// ## Errors
    /// Returns `DbError::NotFound` when the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> DbResult<()>;

    async fn query(&self, collection: &str, query: &DocumentQuery) -> DbResult<Vec<Document>>;

    async fn count(&self, collection: &str) -> DbResult<u64>;
}

pub(crate) fn ensure_object(data: &Value) -> DbResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(crate::error::DbError::InvalidDocument(
            "document body must be a JSON object".to_string(),
        ))
    }
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
