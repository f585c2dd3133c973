//! Notifier that only logs

use super::types::{CompletionEvent, Notifier};
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Writes completion events to the log, for runs with no topic configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, event: &CompletionEvent) -> Result<()> {
        let payload = String::from_utf8_lossy(&event.payload()?).into_owned();
        info!(
            file_name = %event.file_name,
            table_id = %event.table_id,
            %payload,
            "Completion event"
        );
        Ok(())
    }
}
