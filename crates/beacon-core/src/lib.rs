//! beacon-core — shared types and error taxonomy for overlay
//! service-advertisement topics. All other beacon crates depend on this one.

pub mod error;
pub mod record;
pub mod types;

pub use error::TopicError;
pub use record::{AdvertisementRecord, RecordQuery, SortOrder, UtxoRef};
pub use types::{now_ms, TopicManagerMetadata, TopicMessage, TopicSubscription};
