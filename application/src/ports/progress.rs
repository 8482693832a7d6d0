//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is processed.

use oracle_domain::{AnalysisResult, OutcomeStatus, QueryId, ResponseSet};

/// Callback for progress updates during query processing
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when responder calls are dispatched
    fn on_collection_start(&self, query_id: &QueryId, responders: usize);

    /// Called as each responder resolves or is cut off
    fn on_responder_complete(&self, query_id: &QueryId, responder: &str, status: OutcomeStatus);

    /// Called once the response set is frozen
    fn on_collection_complete(&self, query_id: &QueryId, responses: &ResponseSet);

    /// Called when the verdict has been built
    fn on_verdict(&self, _query_id: &QueryId, _result: &AnalysisResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_collection_start(&self, _query_id: &QueryId, _responders: usize) {}
    fn on_responder_complete(&self, _query_id: &QueryId, _responder: &str, _status: OutcomeStatus) {
    }
    fn on_collection_complete(&self, _query_id: &QueryId, _responses: &ResponseSet) {}
}
