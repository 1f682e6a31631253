//! Error taxonomy for the topic registry.
//!
//! All errors are ordinary return values; none are fatal to the registry.
//! Messages for topics with no active subscription are deliberately *not*
//! errors — that case is a silent no-op in the dispatcher.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicError {
    /// Empty topic name on a registry operation. No state is mutated.
    #[error("topic name cannot be empty")]
    EmptyTopic,

    /// Empty topic on an inbound message. No state is mutated.
    #[error("message topic cannot be empty")]
    EmptyMessageTopic,

    /// Unsubscribe attempted on a topic with no bound handler — whether
    /// the topic is unknown or merely inactive. No state is mutated.
    #[error("not subscribed to topic: {0}")]
    NotSubscribed(String),

    /// The bound handler returned an error while processing a delivered
    /// message. The attempt counter was already incremented and is not
    /// rolled back.
    #[error("failed to handle message for topic {topic}: {source}")]
    Handler {
        topic: String,
        #[source]
        source: anyhow::Error,
    },
}
