//! Advertisement record types for the storage and lookup collaborators.
//!
//! A record ties a service advertisement to the on-chain output that
//! carries it. The topic registry itself never touches these; they exist
//! for the record store and lookup service built on top of it.

use serde::{Deserialize, Serialize};

/// One stored service advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvertisementRecord {
    /// Transaction id of the output carrying this advertisement.
    pub txid: String,
    /// Index of the output within that transaction.
    pub output_index: u32,
    /// Public key identifying the advertising host.
    pub identity_key: String,
    /// Where the advertised service is hosted.
    pub domain: String,
    /// The advertised service name.
    pub service: String,
    /// When this record was stored (unix ms).
    pub created_at: u64,
}

/// Reference to the output a matching record lives in — the projection
/// returned by every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRef {
    pub txid: String,
    pub output_index: u32,
}

impl From<&AdvertisementRecord> for UtxoRef {
    fn from(record: &AdvertisementRecord) -> Self {
        Self {
            txid: record.txid.clone(),
            output_index: record.output_index,
        }
    }
}

/// Sort order for query results, by `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Newest first — the default.
    #[default]
    Desc,
}

/// Filter and pagination parameters for record queries.
///
/// Absent filters do not constrain results; filters that are present
/// require exact matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordQuery {
    pub domain: Option<String>,
    pub service: Option<String>,
    pub identity_key: Option<String>,
    /// Maximum number of results. `None` or `Some(0)` means no limit.
    pub limit: Option<usize>,
    /// Number of matching records to skip before collecting results.
    pub skip: Option<usize>,
    pub sort_order: Option<SortOrder>,
}

impl RecordQuery {
    /// True iff `record` passes every present filter.
    pub fn matches(&self, record: &AdvertisementRecord) -> bool {
        if let Some(domain) = &self.domain {
            if record.domain != *domain {
                return false;
            }
        }
        if let Some(service) = &self.service {
            if record.service != *service {
                return false;
            }
        }
        if let Some(identity_key) = &self.identity_key {
            if record.identity_key != *identity_key {
                return false;
            }
        }
        true
    }
}
