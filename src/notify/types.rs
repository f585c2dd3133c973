//! Completion event and notifier trait

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Status carried by a completion event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Completed,
}

/// Published once a file has been loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Object name that triggered the ingestion
    pub file_name: String,
    /// Destination table id (`{base}_{hash}`)
    pub table_id: String,
    pub status: CompletionStatus,
}

impl CompletionEvent {
    pub fn completed(file_name: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            table_id: table_id.into(),
            status: CompletionStatus::Completed,
        }
    }

    /// UTF-8 JSON payload as published
    pub fn payload(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Publishes completion events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event: &CompletionEvent) -> Result<()>;
}
