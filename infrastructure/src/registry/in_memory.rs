//! In-memory query registry
//!
//! Records live for the lifetime of the process. There is no eviction and
//! no removal: a record, once inserted, only moves forward through its
//! lifecycle.

use oracle_application::{QueryRegistry, RegistryError};
use oracle_domain::{QueryId, QueryRecord, QueryState, QueryTransition};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// [`QueryRegistry`] backed by a `HashMap` behind a `std::sync::RwLock`
///
/// Each call holds the lock only for a map lookup or a single record
/// update, so the synchronous lock is safe to use from async tasks.
/// A poisoned lock is recovered rather than propagated: every update is
/// applied to a record in one step, so no half-written state can be
/// observed.
#[derive(Debug, Default)]
pub struct InMemoryQueryRegistry {
    records: RwLock<HashMap<QueryId, QueryRecord>>,
}

impl InMemoryQueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryRegistry for InMemoryQueryRegistry {
    fn insert(&self, record: QueryRecord) -> Result<(), RegistryError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(record.id()) {
            return Err(RegistryError::Duplicate(record.id().clone()));
        }
        debug!(query_id = %record.id(), "Registering query");
        records.insert(record.id().clone(), record);
        Ok(())
    }

    fn apply(
        &self,
        id: &QueryId,
        transition: QueryTransition,
    ) -> Result<QueryState, RegistryError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let record = records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let from = record.state;
        let to = record.apply(transition)?;
        debug!(query_id = %id, %from, %to, "Query state changed");
        Ok(to)
    }

    fn get(&self, id: &QueryId) -> Option<QueryRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.get(id).cloned()
    }

    fn list(&self) -> Vec<QueryRecord> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        let mut list: Vec<QueryRecord> = records.values().cloned().collect();
        list.sort_by(|a, b| b.id().cmp(a.id()));
        list
    }

    fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
