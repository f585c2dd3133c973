//! Ingestion report types

use crate::schema::Schema;
use crate::storage::StorageEvent;
use crate::warehouse::ProvisionOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether the completion event went out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Published,
    /// Publishing failed; the data stays loaded
    Failed { message: String },
}

impl NotificationOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Outcome of one successful ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// The triggering event
    pub event: StorageEvent,
    pub dataset: String,
    /// `{base_table}_{fingerprint}`
    pub table_id: String,
    pub provision: ProvisionOutcome,
    /// Rows inserted
    pub rows: usize,
    pub schema: Schema,
    pub notification: NotificationOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestReport {
    /// Wall-clock time spent on the event
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
