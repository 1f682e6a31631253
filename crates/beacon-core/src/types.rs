//! Topic subscription and message types.
//!
//! A topic names a category of overlay protocol messages. The registry
//! tracks one `TopicSubscription` per topic name for the lifetime of the
//! process; "unsubscribe" only deactivates, it never deletes.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Per-topic subscription state, as exposed to callers.
///
/// Snapshots returned by the registry are copies; mutating them has no
/// effect on the registry itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSubscription {
    /// Topic name — non-empty, unique key.
    pub topic: String,
    /// True iff a handler is currently bound for this topic.
    pub is_active: bool,
    /// Delivery attempts made to this topic. Counts attempts, not
    /// successes: a handler error does not roll this back.
    pub message_count: u64,
    /// When this subscription record was first created (unix ms).
    /// Set once; re-subscribing reuses the record and keeps this.
    pub created_at: u64,
}

/// An inbound message routed through the dispatcher.
///
/// Transient — consumed once, never persisted. The payload and
/// `message_id` are opaque to the registry; it validates neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicMessage {
    /// Topic this message belongs to.
    pub topic: String,
    /// Type-specific content. Structure is defined by the topic's protocol.
    pub payload: serde_json::Value,
    /// When the message was received off the wire (unix ms).
    pub received_at: u64,
    /// Sender-assigned identifier, carried verbatim.
    pub message_id: String,
}

impl TopicMessage {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value, message_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload,
            received_at: now_ms(),
            message_id: message_id.into(),
        }
    }
}

/// Fixed self-description used for capability advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicManagerMetadata {
    pub name: &'static str,
    pub short_description: &'static str,
}
