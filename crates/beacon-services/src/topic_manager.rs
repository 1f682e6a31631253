//! Topic subscription registry and message dispatcher.
//!
//! One subscription record per topic name, created lazily and kept for
//! the life of the registry; "unsubscribe" only unbinds the handler.
//! Inbound messages are routed to the bound handler while per-topic
//! delivery-attempt counters are tracked.
//!
//! The table is a `DashMap` keyed by topic, with the counter, creation
//! time, and handler binding held in one entry — every per-topic mutation
//! is a single entry operation, so a reader can never observe a record
//! that is active without a handler or vice versa. Distinct topics do not
//! block each other.

use dashmap::DashMap;
use std::sync::Arc;

use beacon_core::{now_ms, TopicError, TopicManagerMetadata, TopicMessage, TopicSubscription};

use crate::lookup::LookupService;
use crate::record_store::RecordStore;

/// Handler bound to a topic; invoked once per delivered message.
///
/// May have arbitrary side effects. An error is surfaced to the
/// dispatcher's caller as [`TopicError::Handler`]; the registry never
/// retries on its own.
pub trait TopicHandler: Send + Sync {
    fn handle(&self, message: &TopicMessage) -> anyhow::Result<()>;
}

impl<F> TopicHandler for F
where
    F: Fn(&TopicMessage) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, message: &TopicMessage) -> anyhow::Result<()> {
        self(message)
    }
}

/// Per-topic state. Present in the table iff the topic is known;
/// `handler` presence is what "active" means.
struct TopicEntry {
    handler: Option<Arc<dyn TopicHandler>>,
    message_count: u64,
    created_at: u64,
}

impl TopicEntry {
    fn new() -> Self {
        Self {
            handler: None,
            message_count: 0,
            created_at: now_ms(),
        }
    }

    fn snapshot(&self, topic: &str) -> TopicSubscription {
        TopicSubscription {
            topic: topic.to_owned(),
            is_active: self.handler.is_some(),
            message_count: self.message_count,
            created_at: self.created_at,
        }
    }
}

/// Topic subscription registry and dispatcher.
///
/// The record store and lookup service are injected collaborators for
/// functionality layered on top; none of the operations here call them.
pub struct TopicManager {
    store: Arc<dyn RecordStore>,
    lookup_service: Option<Arc<LookupService>>,
    topics: DashMap<String, TopicEntry>,
}

impl TopicManager {
    pub fn new(store: Arc<dyn RecordStore>, lookup_service: Option<Arc<LookupService>>) -> Self {
        Self {
            store,
            lookup_service,
            topics: DashMap::new(),
        }
    }

    /// The injected record store.
    pub fn record_store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// The injected lookup service, if one was configured.
    pub fn lookup_service(&self) -> Option<&Arc<LookupService>> {
        self.lookup_service.as_ref()
    }

    /// Ensure a subscription record exists for `topic` and return a
    /// snapshot of it. Idempotent: an existing record is returned
    /// unchanged, with no activation side effect. Never binds a handler.
    pub fn create_topic_subscription(&self, topic: &str) -> Result<TopicSubscription, TopicError> {
        if topic.is_empty() {
            return Err(TopicError::EmptyTopic);
        }
        let entry = self.topics.entry(topic.to_owned()).or_insert_with(|| {
            tracing::debug!(topic = %topic, "topic subscription created");
            TopicEntry::new()
        });
        Ok(entry.snapshot(topic))
    }

    /// Bind `handler` to `topic`, creating the subscription record if it
    /// does not exist and activating it. Re-subscribing replaces the
    /// previous handler; exactly one record per topic is ever kept.
    pub fn subscribe_to_topic(
        &self,
        topic: &str,
        handler: Arc<dyn TopicHandler>,
    ) -> Result<(), TopicError> {
        if topic.is_empty() {
            return Err(TopicError::EmptyTopic);
        }
        let mut entry = self
            .topics
            .entry(topic.to_owned())
            .or_insert_with(TopicEntry::new);
        let replaced = entry.handler.replace(handler).is_some();
        tracing::info!(topic = %topic, replaced, "subscribed to topic");
        Ok(())
    }

    /// Unbind the handler for `topic` and deactivate it. The record and
    /// its accumulated counter are left untouched.
    ///
    /// Fails with [`TopicError::NotSubscribed`] when no handler is bound,
    /// whether the topic is unknown or merely inactive.
    pub fn unsubscribe_from_topic(&self, topic: &str) -> Result<(), TopicError> {
        if topic.is_empty() {
            return Err(TopicError::EmptyTopic);
        }
        match self.topics.get_mut(topic) {
            Some(mut entry) if entry.handler.is_some() => {
                entry.handler = None;
                tracing::info!(topic = %topic, "unsubscribed from topic");
                Ok(())
            }
            _ => Err(TopicError::NotSubscribed(topic.to_owned())),
        }
    }

    /// True iff a record exists for `topic` and a handler is bound.
    pub fn is_subscribed_to_topic(&self, topic: &str) -> bool {
        self.topics
            .get(topic)
            .map(|entry| entry.handler.is_some())
            .unwrap_or(false)
    }

    /// Snapshot of every known record, active and inactive.
    /// Order is unspecified.
    pub fn subscribed_topics(&self) -> Vec<TopicSubscription> {
        self.topics
            .iter()
            .map(|entry| entry.value().snapshot(entry.key()))
            .collect()
    }

    /// Number of topics with a handler currently bound.
    pub fn active_topic_count(&self) -> usize {
        self.topics
            .iter()
            .filter(|entry| entry.handler.is_some())
            .count()
    }

    /// Delivery attempts recorded for `topic`; 0 for unknown topics.
    pub fn topic_message_count(&self, topic: &str) -> u64 {
        self.topics
            .get(topic)
            .map(|entry| entry.message_count)
            .unwrap_or(0)
    }

    /// Sum of delivery attempts across all known topics.
    pub fn total_message_count(&self) -> u64 {
        self.topics.iter().map(|entry| entry.message_count).sum()
    }

    /// Route an inbound message to the handler bound to its topic.
    ///
    /// A message for an unknown or inactive topic is a silent success:
    /// no handler runs and no counter moves. Unrelated overlay traffic
    /// must stay cheap and must not look like an application error.
    ///
    /// For an active topic the attempt counter is incremented first and
    /// is not rolled back if the handler then fails; the handler error
    /// comes back wrapped as [`TopicError::Handler`].
    pub fn handle_topic_message(&self, message: &TopicMessage) -> Result<(), TopicError> {
        if message.topic.is_empty() {
            return Err(TopicError::EmptyMessageTopic);
        }

        // Count under the entry lock, invoke after releasing it so a
        // handler may call back into the registry.
        let handler = match self.topics.get_mut(message.topic.as_str()) {
            Some(mut entry) => match entry.handler.clone() {
                Some(handler) => {
                    entry.message_count += 1;
                    handler
                }
                None => {
                    tracing::trace!(topic = %message.topic, "message for inactive topic ignored");
                    return Ok(());
                }
            },
            None => {
                tracing::trace!(topic = %message.topic, "message for unknown topic ignored");
                return Ok(());
            }
        };

        tracing::debug!(
            topic = %message.topic,
            message_id = %message.message_id,
            "delivering message"
        );

        handler.handle(message).map_err(|source| {
            tracing::warn!(topic = %message.topic, error = %source, "handler failed");
            TopicError::Handler {
                topic: message.topic.clone(),
                source,
            }
        })
    }

    /// Deactivate every topic: unbind all handlers, keep all records and
    /// counters. Idempotent; re-subscription afterwards is allowed.
    pub fn close(&self) {
        for mut entry in self.topics.iter_mut() {
            entry.handler = None;
        }
        tracing::info!(topics = self.topics.len(), "topic manager closed");
    }

    /// Fixed descriptor for capability advertisement.
    pub fn metadata(&self) -> TopicManagerMetadata {
        TopicManagerMetadata {
            name: "Beacon Topic Manager",
            short_description: "Manages overlay network topic subscriptions for service advertisement.",
        }
    }
}
