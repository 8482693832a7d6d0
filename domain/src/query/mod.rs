//! Query domain
//!
//! A query is the unit of work of the oracle: one question, asked of K
//! responders under one deadline, ending in exactly one terminal state.

pub mod entities;
pub mod value_objects;

pub use entities::{Query, QueryFailure, QueryId, QueryRecord, QueryState, QueryTransition};
pub use value_objects::{
    CONSENSUS_THRESHOLD_RANGE, MAX_QUERY_CHARS, MIN_TIMEOUT_MS, QueryKind, QueryOptions,
    QueryText,
};
