//! Engine configuration.
//!
//! [`EngineConfig`] groups what the engine needs at construction time:
//! clustering and scoring constants, plus the options applied to a query
//! when the caller does not override them.

use oracle_domain::{ConsensusParams, DomainError, QueryKind, QueryOptions};

/// Static configuration of a [`QueryLifecycle`](crate::QueryLifecycle)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    consensus: ConsensusParams,
    query_defaults: QueryOptions,
}

impl EngineConfig {
    pub fn new(consensus: ConsensusParams, query_defaults: QueryOptions) -> Self {
        Self {
            consensus,
            query_defaults,
        }
    }

    // ==================== Accessors ====================

    /// Clustering and scoring constants.
    pub fn consensus(&self) -> &ConsensusParams {
        &self.consensus
    }

    /// Options used when a caller does not specify its own.
    pub fn query_defaults(&self) -> &QueryOptions {
        &self.query_defaults
    }

    // ==================== Builder Methods ====================

    pub fn with_consensus(mut self, consensus: ConsensusParams) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_query_defaults(mut self, defaults: QueryOptions) -> Self {
        self.query_defaults = defaults;
        self
    }

    // ==================== Validation ====================

    pub fn validate(&self) -> Result<(), DomainError> {
        self.consensus.validate()?;
        self.query_defaults.validate()
    }

    /// Build per-query options from the defaults and optional overrides.
    pub fn options_with(
        &self,
        kind: Option<QueryKind>,
        responder_count: Option<usize>,
        consensus_threshold: Option<f64>,
        timeout_ms: Option<u64>,
    ) -> QueryOptions {
        let defaults = self.query_defaults;
        QueryOptions {
            kind: kind.unwrap_or(defaults.kind),
            responder_count: responder_count.unwrap_or(defaults.responder_count),
            consensus_threshold: consensus_threshold.unwrap_or(defaults.consensus_threshold),
            timeout_ms: timeout_ms.unwrap_or(defaults.timeout_ms),
        }
    }
}
