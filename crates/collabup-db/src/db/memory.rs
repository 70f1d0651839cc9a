//! In-process `DocumentStore` for development and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::query::compare_by_field;
use super::{DocumentQuery, DocumentStore, WriteMode, ensure_object, new_document_id};
use crate::error::{DbError, DbResult};
use crate::model::document::Document;

type Collection = BTreeMap<String, Value>;

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn merge_into(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone())))
    }

    async fn create(&self, collection: &str, data: Value) -> DbResult<Document> {
        ensure_object(&data)?;

        let id = new_document_id();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data.clone());

        Ok(Document::new(id, data))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        mode: WriteMode,
    ) -> DbResult<()> {
        ensure_object(&data)?;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match (mode, docs.get_mut(id)) {
            (WriteMode::Merge, Some(existing)) => merge_into(existing, data),
            _ => {
                docs.insert(id.to_string(), data);
            }
        }

        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> DbResult<()> {
        ensure_object(&patch)?;

        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| DbError::not_found(collection, id))?;
        merge_into(existing, patch);

        Ok(())
    }

    async fn query(&self, collection: &str, query: &DocumentQuery) -> DbResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        // BTreeMap iteration keeps ties in id order, matching the SQL adapter.
        let mut matched: Vec<(&String, &Value)> =
            docs.iter().filter(|(_, data)| query.matches(data)).collect();

        if let Some(order) = &query.order_by {
            matched.sort_by(|(_, a), (_, b)| compare_by_field(a, b, order));
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect())
    }

    async fn count(&self, collection: &str) -> DbResult<u64> {
        let collections = self.collections.read().await;
        let count = collections.get(collection).map_or(0, BTreeMap::len);
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}

impl MemoryDocumentStore {
    /// ## Summary
    /// Seeds a document with a fixed id, replacing any existing body.
    pub async fn insert(&self, collection: &str, id: &str, data: Value) {
        let data = match data {
            Value::Object(_) => data,
            _ => Value::Object(Map::new()),
        };
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
    }
}
