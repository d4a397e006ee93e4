//! Remote relational record store
//!
//! Talks to the store's REST interface: a stored-procedure call for the
//! session-id sequence and an upsert against the `evaluations` table with
//! conflict target (session_identifier, eval_id).

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{EvaluationRecord, RecordStore};
use crate::{Error, Result};

pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(base_url: String, service_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("qualeval/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn issue_session_id(&self) -> Result<i64> {
        let url = format!("{}/rest/v1/rpc/get_next_session_id", self.base_url);
        debug!("Calling session-id sequence at {}", url);

        let response = self
            .authed(self.client.post(&url))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Session-id RPC failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "Session-id RPC returned {}: {}",
                status, body
            )));
        }

        // The RPC returns a bare integer
        let id: i64 = response
            .json()
            .await
            .map_err(|e| Error::Storage(format!("Session-id RPC returned non-integer body: {}", e)))?;
        Ok(id)
    }

    async fn upsert_record(&self, record: &EvaluationRecord) -> Result<()> {
        let url = format!("{}/rest/v1/evaluations", self.base_url);
        debug!(
            "Upserting evaluation ({}, {})",
            record.session_identifier, record.eval_id
        );

        // merge-duplicates + on_conflict makes this insert-or-overwrite on
        // the (session_identifier, eval_id) unique constraint
        let response = self
            .authed(self.client.post(&url))
            .query(&[("on_conflict", "session_identifier,eval_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Upsert request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!("Upsert returned {}: {}", status, body)));
        }

        Ok(())
    }
}
