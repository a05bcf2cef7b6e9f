//! In-process report store.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use auto_watch_report_models::{ReportId, ReportType};

use crate::{DbError, ReportStore, StoredDocument, new_document_id};

/// Keeps every collection in memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    collections: Mutex<BTreeMap<ReportType, Vec<StoredDocument>>>,
    unavailable: AtomicBool,
}

impl MemoryReportStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`DbError::Unavailable`] until
    /// reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable);
        }
        Ok(())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ReportType, Vec<StoredDocument>>>, DbError>
    {
        self.collections
            .lock()
            .map_err(|e| DbError::Database(e.to_string()))
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self, collection: ReportType) -> Result<Vec<StoredDocument>, DbError> {
        self.check_available()?;
        Ok(self.lock()?.get(&collection).cloned().unwrap_or_default())
    }

    async fn insert(
        &self,
        collection: ReportType,
        body: serde_json::Value,
    ) -> Result<ReportId, DbError> {
        self.check_available()?;
        let id = new_document_id();
        self.lock()?
            .entry(collection)
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body,
            });
        Ok(id)
    }
}
