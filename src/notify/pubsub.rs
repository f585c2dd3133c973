//! Pub/Sub REST publisher
//!
//! Publishes through the `topics.publish` endpoint: the payload is base64
//! encoded into a single message of a `{"messages": [...]}` request.

use super::types::{CompletionEvent, Notifier};
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Public Pub/Sub REST endpoint
pub const DEFAULT_PUBSUB_ENDPOINT: &str = "https://pubsub.googleapis.com/v1/";

/// Default request timeout
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Notifier publishing to a Pub/Sub topic
#[derive(Debug, Clone)]
pub struct PubSubNotifier {
    client: Client,
    /// `{endpoint}/{topic}:publish`
    publish_url: Url,
    /// Bearer token, if the endpoint needs one
    token: Option<String>,
}

impl PubSubNotifier {
    /// Notifier for `topic` (e.g. `projects/p/topics/t`) on `endpoint`
    pub fn new(endpoint: &Url, topic: &str, timeout: Duration) -> Result<Self> {
        let topic = topic.trim_matches('/');
        if topic.is_empty() {
            return Err(Error::invalid_value("topic", "must not be empty"));
        }

        let mut base = endpoint.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        // "./" keeps a bare topic like "done" from parsing as a URL scheme
        let publish_url = base.join(&format!("./{topic}:publish"))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("json-ingest/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            publish_url,
            token: None,
        })
    }

    /// Notifier for `topic` on the public endpoint
    pub fn for_topic(topic: &str) -> Result<Self> {
        let endpoint = Url::parse(DEFAULT_PUBSUB_ENDPOINT)?;
        Self::new(&endpoint, topic, DEFAULT_NOTIFY_TIMEOUT)
    }

    /// Send `Authorization: Bearer {token}` with every publish
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn publish_url(&self) -> &Url {
        &self.publish_url
    }

    fn request_body(payload: &[u8]) -> Value {
        let data = base64::engine::general_purpose::STANDARD.encode(payload);
        json!({ "messages": [{ "data": data }] })
    }
}

#[async_trait]
impl Notifier for PubSubNotifier {
    async fn publish(&self, event: &CompletionEvent) -> Result<()> {
        let body = Self::request_body(&event.payload()?);

        let mut request = self.client.post(self.publish_url.clone()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(url = %self.publish_url, "Publishing completion event");
        let response = request
            .send()
            .await
            .map_err(|e| Error::notification(format!("publish request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::notification(format!(
                "publish returned HTTP {}: {}",
                status.as_u16(),
                text.trim()
            )));
        }

        let ids = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("messageIds").cloned())
            .unwrap_or(Value::Null);
        info!(
            file_name = %event.file_name,
            table_id = %event.table_id,
            message_ids = %ids,
            "Published completion event"
        );
        Ok(())
    }
}
