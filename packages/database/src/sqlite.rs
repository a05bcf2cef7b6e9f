//! `SQLite` document storage.
//!
//! Each report is one row in the `documents` table with its JSON body in a
//! text column. Rows are returned in insertion order.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use auto_watch_report_models::{ReportId, ReportType};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;

use crate::{DbError, ReportStore, StoredDocument, new_document_id};

/// Default path for the reports database.
pub const DEFAULT_DB_PATH: &str = "data/reports.db";

/// Report store backed by a local `SQLite` file.
pub struct SqliteReportStore {
    db: Arc<dyn Database>,
}

impl std::fmt::Debug for SqliteReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteReportStore").finish_non_exhaustive()
    }
}

impl SqliteReportStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the file cannot be opened or schema creation
    /// fails.
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Database(e.to_string()))?;
        ensure_schema(db.as_ref()).await?;

        log::info!("Opened report database at {}", path.display());

        Ok(Self { db: Arc::from(db) })
    }
}

async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS documents (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT NOT NULL UNIQUE,
            collection  TEXT NOT NULL,
            body        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection
         ON documents (collection, seq)",
    )
    .await
    .map_err(|e| DbError::Database(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_all(&self, collection: ReportType) -> Result<Vec<StoredDocument>, DbError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, body FROM documents
                 WHERE collection = $1
                 ORDER BY seq",
                &[DatabaseValue::String(collection.collection().to_string())],
            )
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row
                .to_value("id")
                .map_err(|e| DbError::Conversion {
                    message: format!("{e:?}"),
                })?;
            let body: String = row.to_value("body").unwrap_or_default();
            documents.push(StoredDocument {
                id: ReportId(id),
                body: serde_json::from_str(&body)?,
            });
        }

        Ok(documents)
    }

    async fn insert(
        &self,
        collection: ReportType,
        body: serde_json::Value,
    ) -> Result<ReportId, DbError> {
        let id = new_document_id();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .exec_raw_params(
                "INSERT INTO documents (id, collection, body, created_at)
                 VALUES ($1, $2, $3, $4)",
                &[
                    DatabaseValue::String(id.0.clone()),
                    DatabaseValue::String(collection.collection().to_string()),
                    DatabaseValue::String(serde_json::to_string(&body)?),
                    DatabaseValue::String(now),
                ],
            )
            .await
            .map_err(|e| DbError::Database(e.to_string()))?;

        Ok(id)
    }
}
