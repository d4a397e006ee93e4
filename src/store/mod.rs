//! Record storage behind one narrow interface
//!
//! Two operations cover everything the survey needs from its backing store:
//! issuing a fresh session id and upserting one rating row keyed on
//! (session, item). Backends are strategy objects selected by configuration,
//! so the remote relational store and the local SQLite store share route
//! logic instead of duplicating it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::Result;

pub mod sqlite;
pub mod supabase;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

/// One submitted rating. Field names are the wire/column names of the
/// `evaluations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub session_identifier: i64,
    pub eval_id: String,
    pub item_class: String,
    pub item_metric: String,
    pub item_case: String,
    pub comparative_rating: String,
    pub test_rating: i64,
    pub comparison_rating: i64,
    pub comments: String,
}

/// Narrow storage interface: sequence issuance plus keyed upsert.
///
/// `upsert_record` must be last-write-wins on the logical key
/// (session_identifier, eval_id); a re-submission for the same key
/// overwrites the rating and comment fields rather than inserting a
/// duplicate row. Conflict resolution itself is the backend's job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Obtain a fresh sequential session id from the store.
    async fn issue_session_id(&self) -> Result<i64>;

    /// Insert or overwrite the record for (session_identifier, eval_id).
    async fn upsert_record(&self, record: &EvaluationRecord) -> Result<()>;
}

/// Connect the configured backend, or none when credentials are absent.
pub async fn connect(config: &StorageConfig) -> Result<Option<Arc<dyn RecordStore>>> {
    match config {
        StorageConfig::Supabase { url, service_key } => {
            let store = SupabaseStore::new(url.clone(), service_key.clone())?;
            info!("Record store: remote relational ({})", url);
            Ok(Some(Arc::new(store)))
        }
        StorageConfig::Sqlite { path } => {
            let store = SqliteStore::connect(path).await?;
            info!("Record store: local SQLite ({})", path.display());
            Ok(Some(Arc::new(store)))
        }
        StorageConfig::Disabled => {
            warn!("No storage credentials configured; submission endpoints will report storage as uninitialized");
            Ok(None)
        }
    }
}
