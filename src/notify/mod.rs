//! Notify module
//!
//! Announces that a file has been loaded.
//!
//! - `PubSubNotifier` - publishes to a Pub/Sub topic over REST
//! - `LogNotifier` - logs the event, used when no topic is configured

mod logging;
mod pubsub;
mod types;

pub use logging::LogNotifier;
pub use pubsub::{PubSubNotifier, DEFAULT_NOTIFY_TIMEOUT, DEFAULT_PUBSUB_ENDPOINT};
pub use types::{CompletionEvent, CompletionStatus, Notifier};
