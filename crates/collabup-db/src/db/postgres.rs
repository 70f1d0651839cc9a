//! PostgreSQL adapter for `DocumentStore`.
//!
//! Documents live in one `document` table keyed by `(collection, id)` with the
//! body in a `jsonb` column. Field filters and ordering are evaluated with
//! `jsonb` operators, so the table behaves like a schemaless document store.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Jsonb, Text};
use diesel_async::RunQueryDsl;
use serde_json::Value;

use super::connection::{DbConnection, DbPool};
use super::query::Direction;
use super::{DocumentQuery, DocumentStore, WriteMode, ensure_object, new_document_id, schema};
use crate::error::{DbError, DbResult};
use crate::model::document::{Document, DocumentRow, NewDocument};

const MERGE_UPSERT: &str = "INSERT INTO document (collection, id, data) VALUES ($1, $2, $3) \
     ON CONFLICT (collection, id) DO UPDATE \
     SET data = document.data || EXCLUDED.data, updated_at = now()";

const REPLACE_UPSERT: &str = "INSERT INTO document (collection, id, data) VALUES ($1, $2, $3) \
     ON CONFLICT (collection, id) DO UPDATE \
     SET data = EXCLUDED.data, updated_at = now()";

const MERGE_UPDATE: &str = "UPDATE document SET data = data || $3, updated_at = now() \
     WHERE collection = $1 AND id = $2";

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> DbResult<DbConnection<'_>> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[tracing::instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<Document>> {
        use schema::document::dsl;

        let mut conn = self.connection().await?;
        let row = dsl::document
            .filter(dsl::collection.eq(collection))
            .filter(dsl::id.eq(id))
            .select(DocumentRow::as_select())
            .first::<DocumentRow>(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Document::from))
    }

    #[tracing::instrument(skip(self, data))]
    async fn create(&self, collection: &str, data: Value) -> DbResult<Document> {
        ensure_object(&data)?;

        let id = new_document_id();
        let mut conn = self.connection().await?;
        diesel::insert_into(schema::document::table)
            .values(&NewDocument {
                collection,
                id: &id,
                data: &data,
            })
            .execute(&mut conn)
            .await?;

        tracing::debug!(%id, "Document created");

        Ok(Document::new(id, data))
    }

    #[tracing::instrument(skip(self, data))]
    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        mode: WriteMode,
    ) -> DbResult<()> {
        ensure_object(&data)?;

        let statement = match mode {
            WriteMode::Merge => MERGE_UPSERT,
            WriteMode::Replace => REPLACE_UPSERT,
        };

        let mut conn = self.connection().await?;
        let _row_count = diesel::sql_query(statement)
            .bind::<Text, _>(collection)
            .bind::<Text, _>(id)
            .bind::<Jsonb, _>(&data)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update(&self, collection: &str, id: &str, patch: Value) -> DbResult<()> {
        ensure_object(&patch)?;

        let mut conn = self.connection().await?;
        let row_count = diesel::sql_query(MERGE_UPDATE)
            .bind::<Text, _>(collection)
            .bind::<Text, _>(id)
            .bind::<Jsonb, _>(&patch)
            .execute(&mut conn)
            .await?;

        if row_count == 0 {
            return Err(DbError::not_found(collection, id));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn query(&self, collection: &str, query: &DocumentQuery) -> DbResult<Vec<Document>> {
        let mut sql = diesel::sql_query("SELECT id, data FROM document WHERE collection = $1")
            .into_boxed::<Pg>()
            .bind::<Text, _>(collection.to_string());
        let mut next_param = 2;

        if let Some(filter) = &query.filter {
            sql = sql
                .sql(format!(
                    " AND data -> ${} = ${}",
                    next_param,
                    next_param + 1
                ))
                .bind::<Text, _>(filter.field.clone())
                .bind::<Jsonb, _>(filter.value.clone());
            next_param += 2;
        }

        if let Some(order) = &query.order_by {
            let direction = match order.direction {
                Direction::Ascending => "ASC",
                Direction::Descending => "DESC",
            };
            sql = sql
                .sql(format!(
                    " ORDER BY data -> ${next_param} {direction} NULLS LAST, id ASC"
                ))
                .bind::<Text, _>(order.field.clone());
            next_param += 1;
        } else {
            sql = sql.sql(" ORDER BY id ASC");
        }

        if let Some(limit) = query.limit {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            sql = sql
                .sql(format!(" LIMIT ${next_param}"))
                .bind::<BigInt, _>(limit);
        }

        let mut conn = self.connection().await?;
        let rows = sql.load::<DocumentRow>(&mut conn).await?;

        tracing::trace!(count = rows.len(), "Query returned documents");

        Ok(rows.into_iter().map(Document::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, collection: &str) -> DbResult<u64> {
        use schema::document::dsl;

        let mut conn = self.connection().await?;
        let count = dsl::document
            .filter(dsl::collection.eq(collection))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
