#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Document store access for theft and sighting reports.
//!
//! Reports live in two collections, `theftmarkers` and `sightingmarkers`.
//! The store only supports two operations: fetch every document in a
//! collection, and append a new document. Nothing is updated or deleted.
//!
//! Three backends implement [`ReportStore`]:
//!
//! - [`sqlite::SqliteReportStore`] keeps JSON documents in a `SQLite` table
//!   via `switchy_database`.
//! - [`firestore::FirestoreReportStore`] talks to a hosted Firestore
//!   database over its REST API.
//! - [`memory::MemoryReportStore`] holds documents in process memory.
//!
//! The typed helpers in [`documents`] convert between documents and the
//! report types.

pub mod documents;
pub mod firestore;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use auto_watch_report_models::{ReportId, ReportType};

/// Errors that can occur while reading or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP request to a hosted store failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted store answered with an error status.
    #[error("Store responded with {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// The store is not reachable.
    #[error("Store unavailable")]
    Unavailable,
}

/// A raw document and the id the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Store-assigned id.
    pub id: ReportId,
    /// Document body without the id.
    pub body: serde_json::Value,
}

/// An append-only document store with one collection per report type.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Returns every document in `collection`, in insertion order where the
    /// backend has one.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be read.
    async fn fetch_all(&self, collection: ReportType) -> Result<Vec<StoredDocument>, DbError>;

    /// Appends `body` to `collection` and returns the new document's id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails.
    async fn insert(
        &self,
        collection: ReportType,
        body: serde_json::Value,
    ) -> Result<ReportId, DbError>;
}

/// Generates a new opaque document id.
#[must_use]
pub fn new_document_id() -> ReportId {
    ReportId(uuid::Uuid::new_v4().simple().to_string())
}
