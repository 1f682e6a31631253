//! Lookup service over the advertisement record store.
//!
//! Answers discovery queries: either everything that has been advertised,
//! or the subset matching domain/service/identity-key filters. Results
//! are output references only; fetching full advertisements is the
//! caller's concern.

use anyhow::Result;
use std::sync::Arc;

use beacon_core::{RecordQuery, SortOrder, UtxoRef};

use crate::record_store::RecordStore;

/// A discovery question posed to the lookup service.
#[derive(Debug, Clone)]
pub enum LookupQuery {
    /// Return every known record.
    FindAll {
        limit: Option<usize>,
        skip: Option<usize>,
        sort_order: Option<SortOrder>,
    },
    /// Return records matching the given filters.
    Filter(RecordQuery),
}

/// Thin query layer over a [`RecordStore`].
pub struct LookupService {
    store: Arc<dyn RecordStore>,
}

impl LookupService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn lookup(&self, query: &LookupQuery) -> Result<Vec<UtxoRef>> {
        let results = match query {
            LookupQuery::FindAll {
                limit,
                skip,
                sort_order,
            } => self.store.find_all(*limit, *skip, *sort_order)?,
            LookupQuery::Filter(filter) => self.store.find(filter)?,
        };
        tracing::debug!(results = results.len(), "lookup answered");
        Ok(results)
    }
}
