//! beacon-services — topic subscription registry and dispatcher for
//! overlay service advertisements, plus the record store and lookup
//! collaborators it is constructed with.

pub mod lookup;
pub mod record_store;
pub mod topic_manager;

pub use lookup::{LookupQuery, LookupService};
pub use record_store::{MemoryRecordStore, RecordStore};
pub use topic_manager::{TopicHandler, TopicManager};
