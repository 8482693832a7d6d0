//! Query Lifecycle use case
//!
//! Accepts queries, drives each one through collection, clustering and
//! scoring on its own task, and records the outcome in the registry.

use crate::config::EngineConfig;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::query_registry::{QueryRegistry, RegistryError};
use crate::ports::responder_selector::ResponderSelector;
use crate::use_cases::collect_responses::{CollectError, ResponseCollector};
use oracle_domain::{
    AgreementMeasure, ConsensusAggregator, DomainError, Query, QueryFailure, QueryId,
    QueryOptions, QueryRecord, QueryState, QueryText, QueryTransition, VerdictBuilder,
    VerificationStatus, current_timestamp_ms,
};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Errors returned synchronously by `submit_query`
///
/// A rejected query never enters the registry.
#[derive(Error, Debug)]
pub enum SubmitQueryError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<DomainError> for SubmitQueryError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidQuery(message) => SubmitQueryError::InvalidQuery(message),
            other => SubmitQueryError::InvalidConfiguration(other.to_string()),
        }
    }
}

/// Handle to a submitted query
///
/// Dropping the ticket does not cancel processing.
#[derive(Debug)]
pub struct QueryTicket {
    id: QueryId,
    handle: JoinHandle<QueryState>,
}

impl QueryTicket {
    pub fn id(&self) -> &QueryId {
        &self.id
    }

    /// Wait for the query to reach a terminal state
    ///
    /// Returns `None` if the processing task panicked or was aborted.
    pub async fn wait(self) -> Option<QueryState> {
        self.handle.await.ok()
    }
}

/// The consensus engine
///
/// Cloning is cheap and clones share the registry and the id sequence.
#[derive(Clone)]
pub struct QueryLifecycle {
    config: EngineConfig,
    registry: Arc<dyn QueryRegistry>,
    selector: Arc<dyn ResponderSelector>,
    collector: ResponseCollector,
    aggregator: Arc<ConsensusAggregator>,
    verdict: Arc<VerdictBuilder>,
    progress: Arc<dyn ProgressNotifier>,
    sequence: Arc<AtomicU64>,
    last_ms: Arc<AtomicU64>,
}

impl QueryLifecycle {
    pub fn new(
        config: EngineConfig,
        registry: Arc<dyn QueryRegistry>,
        selector: Arc<dyn ResponderSelector>,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let params = *config.consensus();
        Ok(Self {
            config,
            registry,
            selector,
            collector: ResponseCollector::new(),
            aggregator: Arc::new(ConsensusAggregator::new(params.similarity_threshold)),
            verdict: Arc::new(VerdictBuilder::new(params)),
            progress: Arc::new(NoProgress),
            sequence: Arc::new(AtomicU64::new(0)),
            last_ms: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Report progress of every query through `progress`
    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the default token-overlap agreement measure
    pub fn with_measure(mut self, measure: Arc<dyn AgreementMeasure>) -> Self {
        let threshold = self.aggregator.similarity_threshold();
        self.aggregator = Arc::new(ConsensusAggregator::with_measure(measure, threshold));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Inbound Operations ====================

    /// Validate and register a query, then process it in the background
    ///
    /// Returns as soon as the query is `pending`; responders are never
    /// awaited here. Must be called from within a Tokio runtime.
    pub fn submit_query(
        &self,
        text: impl Into<String>,
        options: QueryOptions,
    ) -> Result<QueryId, SubmitQueryError> {
        self.submit_query_tracked(text, options)
            .map(|ticket| ticket.id)
    }

    /// Like [`submit_query`](Self::submit_query), also returning a handle
    /// that resolves once the query is terminal
    pub fn submit_query_tracked(
        &self,
        text: impl Into<String>,
        options: QueryOptions,
    ) -> Result<QueryTicket, SubmitQueryError> {
        let text = QueryText::new(text)?;
        options.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SubmitQueryError::NoRuntime(e.to_string()))?;

        let query = Query::new(self.next_id(), text, options);
        let id = query.id().clone();
        self.registry.insert(QueryRecord::pending(query.clone()))?;

        info!(
            query_id = %id,
            kind = %options.kind,
            responders = options.responder_count,
            "Query submitted"
        );

        let engine = self.clone();
        let handle = runtime.spawn(async move { engine.process(query).await });

        Ok(QueryTicket { id, handle })
    }

    /// Snapshot of a query's record
    pub fn get_query_result(&self, id: &QueryId) -> Option<QueryRecord> {
        self.registry.get(id)
    }

    /// All queries, most recent first
    pub fn list_queries(&self) -> Vec<QueryRecord> {
        self.registry.list()
    }

    pub fn query_count(&self) -> usize {
        self.registry.len()
    }

    // ==================== Processing ====================

    async fn process(&self, query: Query) -> QueryState {
        let id = query.id().clone();
        let options = *query.options();

        let responders = self
            .selector
            .select(options.kind, options.responder_count);
        if responders.is_empty() {
            warn!(query_id = %id, "No responders selected");
            return self.finish(
                &id,
                QueryTransition::Fail(QueryFailure::InvalidConfiguration {
                    message: "no responders available".to_string(),
                }),
            );
        }
        if responders.len() < options.responder_count {
            warn!(
                query_id = %id,
                requested = options.responder_count,
                selected = responders.len(),
                "Fewer responders available than requested"
            );
        }

        if let Err(e) = self.registry.apply(&id, QueryTransition::Dispatch) {
            warn!(query_id = %id, "Could not start processing: {}", e);
            return self.current_state(&id);
        }
        self.progress.on_collection_start(&id, responders.len());

        let responses = match self
            .collector
            .collect(&query, &responders, self.progress.as_ref())
            .await
        {
            Ok(responses) => responses,
            Err(CollectError::InvalidConfiguration(message)) => {
                return self.finish(
                    &id,
                    QueryTransition::Fail(QueryFailure::InvalidConfiguration { message }),
                );
            }
        };
        self.progress.on_collection_complete(&id, &responses);

        let groups = self.aggregator.cluster(&responses);
        let result = self.verdict.build(&query, responses, groups);
        self.progress.on_verdict(&id, &result);

        info!(
            query_id = %id,
            status = %result.status,
            confidence = result.confidence_score,
            risk = result.hallucination_risk,
            groups = result.groups.len(),
            competing = result.competing_groups(),
            elapsed_ms = result.elapsed_ms,
            "Verdict reached"
        );

        let transition = if result.status == VerificationStatus::Failed {
            QueryTransition::Fail(QueryFailure::NoUsableResponses {
                timed_out: result.responses.timeout_count(),
                errored: result.responses.error_count(),
            })
        } else {
            QueryTransition::Complete(result)
        };
        self.finish(&id, transition)
    }

    fn finish(&self, id: &QueryId, transition: QueryTransition) -> QueryState {
        match self.registry.apply(id, transition) {
            Ok(state) => state,
            Err(e) => {
                warn!(query_id = %id, "Could not record terminal state: {}", e);
                self.current_state(id)
            }
        }
    }

    fn current_state(&self, id: &QueryId) -> QueryState {
        self.registry
            .get(id)
            .map(|record| record.state)
            .unwrap_or(QueryState::Failed)
    }

    /// Next identifier: wall-clock milliseconds that never run backwards,
    /// a per-engine sequence number, and a random suffix
    fn next_id(&self) -> QueryId {
        let now = current_timestamp_ms();
        let submitted_at_ms = self.last_ms.fetch_max(now, Ordering::SeqCst).max(now);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        QueryId::new(submitted_at_ms, sequence, random_suffix())
    }
}

impl std::fmt::Debug for QueryLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryLifecycle")
            .field("config", &self.config)
            .field("aggregator", &self.aggregator)
            .field("queries", &self.registry.len())
            .finish()
    }
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
