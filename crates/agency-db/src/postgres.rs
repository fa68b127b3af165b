//! `DocumentStore` backed by a Postgres `documents` table with a JSONB body.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::path::{CollectionPath, DocPath};
use crate::store::{DocumentStore, StoredDocument};
use crate::DbError;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    doc_id: String,
    data: Json<Value>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.doc_id,
            data: row.data.0,
        }
    }
}

/// Postgres-backed document store. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DocumentStore for PgDocumentStore {
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    async fn get(&self, path: &DocPath) -> Result<Option<Value>, DbError> {
        let data = sqlx::query_scalar::<_, Json<Value>>("SELECT data FROM documents WHERE path = $1")
            .bind(path.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(data.map(|json| json.0))
    }

    /// Upsert keyed by full path; the JSON body is replaced, not merged.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the statement fails.
    async fn set(&self, path: &DocPath, data: &Value) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO documents (path, collection, doc_id, data) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (path) DO UPDATE SET \
               data = EXCLUDED.data, \
               updated_at = NOW()",
        )
        .bind(path.to_string())
        .bind(path.collection.as_str())
        .bind(&path.id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    async fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, DbError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT doc_id, data FROM documents \
             WHERE collection = $1 AND data ->> $2 = $3 \
             ORDER BY doc_id",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDocument>, DbError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT doc_id, data FROM documents WHERE collection = $1 ORDER BY doc_id",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }
}
