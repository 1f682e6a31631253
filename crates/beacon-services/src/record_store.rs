//! Advertisement record storage.
//!
//! `RecordStore` is the seam the topic manager is constructed over; the
//! registry itself never calls it on the subscribe/dispatch paths, but
//! the lookup service queries it. `MemoryRecordStore` is the in-process
//! implementation used by tests and embedders without a database.

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

use beacon_core::{AdvertisementRecord, RecordQuery, SortOrder, UtxoRef};

/// Storage backend for service advertisement records.
///
/// Intentionally minimal. Queries return only the output references;
/// full-record reads are an application concern built on top.
pub trait RecordStore: Send + Sync {
    /// Store a record. A record with the same (txid, output_index)
    /// replaces the previous one.
    fn store(&self, record: AdvertisementRecord) -> Result<()>;

    /// Delete the record for a spent output. Deleting an output that was
    /// never stored is not an error.
    fn delete(&self, txid: &str, output_index: u32) -> Result<()>;

    /// Find references to records matching `query`, sorted by
    /// `created_at` (descending unless the query says otherwise), with
    /// `skip`/`limit` applied after sorting.
    fn find(&self, query: &RecordQuery) -> Result<Vec<UtxoRef>>;

    /// Find references to every record, ignoring filters.
    fn find_all(
        &self,
        limit: Option<usize>,
        skip: Option<usize>,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<UtxoRef>>;
}

/// In-memory record store: (txid, output_index) -> record.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<DashMap<(String, u32), AdvertisementRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn store(&self, record: AdvertisementRecord) -> Result<()> {
        self.records
            .insert((record.txid.clone(), record.output_index), record);
        Ok(())
    }

    fn delete(&self, txid: &str, output_index: u32) -> Result<()> {
        self.records.remove(&(txid.to_owned(), output_index));
        Ok(())
    }

    fn find(&self, query: &RecordQuery) -> Result<Vec<UtxoRef>> {
        let mut matches: Vec<(u64, UtxoRef)> = self
            .records
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| (entry.created_at, UtxoRef::from(entry.value())))
            .collect();

        // Secondary key keeps pagination deterministic when timestamps tie.
        match query.sort_order.unwrap_or_default() {
            SortOrder::Asc => {
                matches.sort_by(|a, b| (a.0, &a.1.txid, a.1.output_index).cmp(&(b.0, &b.1.txid, b.1.output_index)))
            }
            SortOrder::Desc => {
                matches.sort_by(|a, b| (b.0, &b.1.txid, b.1.output_index).cmp(&(a.0, &a.1.txid, a.1.output_index)))
            }
        }

        let skip = query.skip.unwrap_or(0);
        let refs = matches.into_iter().skip(skip).map(|(_, r)| r);
        Ok(match query.limit {
            Some(limit) if limit > 0 => refs.take(limit).collect(),
            _ => refs.collect(),
        })
    }

    fn find_all(
        &self,
        limit: Option<usize>,
        skip: Option<usize>,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<UtxoRef>> {
        self.find(&RecordQuery {
            limit,
            skip,
            sort_order,
            ..Default::default()
        })
    }
}
