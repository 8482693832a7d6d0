//! Query registry port
//!
//! The registry maps query identifiers to their records. It is the only
//! shared mutable structure of the engine: records are inserted once on
//! submission and afterwards change only through lifecycle transitions.

use oracle_domain::{DomainError, QueryId, QueryRecord, QueryState, QueryTransition};
use thiserror::Error;

/// Errors that can occur during registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Query already registered: {0}")]
    Duplicate(QueryId),

    #[error("Query not found: {0}")]
    NotFound(QueryId),

    #[error(transparent)]
    Transition(#[from] DomainError),
}

/// Concurrent store of query records
pub trait QueryRegistry: Send + Sync {
    /// Insert a new record; fails if the identifier is already present
    fn insert(&self, record: QueryRecord) -> Result<(), RegistryError>;

    /// Apply a lifecycle transition to a stored record
    fn apply(&self, id: &QueryId, transition: QueryTransition)
    -> Result<QueryState, RegistryError>;

    /// Snapshot of one record
    fn get(&self, id: &QueryId) -> Option<QueryRecord>;

    /// Snapshot of all records, most recent first
    fn list(&self) -> Vec<QueryRecord>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
