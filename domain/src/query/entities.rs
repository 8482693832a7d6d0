//! Query entities and the query lifecycle state machine.
//!
//! ```text
//! pending ──► processing ──► completed   (verified or disputed verdict)
//!    │             │
//!    └─────────────┴───────► failed      (no usable answer / cannot start)
//! ```
//!
//! Terminal states are final. A [`QueryRecord`] carries an
//! [`AnalysisResult`] exactly when it is `completed`.

use super::value_objects::{QueryOptions, QueryText};
use crate::consensus::verdict::{AnalysisResult, VerificationStatus};
use crate::core::error::DomainError;
use crate::core::time::current_timestamp_ms;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique, monotonically orderable query identifier
///
/// Ordered by submission time, then by the submitting engine's sequence
/// number. Rendered as `query_<ms>_<seq>_<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryId {
    submitted_at_ms: u64,
    sequence: u64,
    suffix: String,
}

impl QueryId {
    pub fn new(submitted_at_ms: u64, sequence: u64, suffix: impl Into<String>) -> Self {
        Self {
            submitted_at_ms,
            sequence,
            suffix: suffix.into(),
        }
    }

    pub fn submitted_at_ms(&self) -> u64 {
        self.submitted_at_ms
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "query_{}_{}_{}",
            self.submitted_at_ms, self.sequence, self.suffix
        )
    }
}

impl std::str::FromStr for QueryId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidQueryId(s.to_string());

        let rest = s.strip_prefix("query_").ok_or_else(invalid)?;
        let mut parts = rest.splitn(3, '_');
        let submitted_at_ms = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let sequence = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let suffix = parts
            .next()
            .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or_else(invalid)?;

        Ok(Self::new(submitted_at_ms, sequence, suffix))
    }
}

impl TryFrom<String> for QueryId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QueryId> for String {
    fn from(value: QueryId) -> Self {
        value.to_string()
    }
}

/// A submitted query (Entity, immutable after creation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    id: QueryId,
    text: QueryText,
    options: QueryOptions,
}

impl Query {
    pub fn new(id: QueryId, text: QueryText, options: QueryOptions) -> Self {
        Self { id, text, options }
    }

    pub fn id(&self) -> &QueryId {
        &self.id
    }

    pub fn text(&self) -> &QueryText {
        &self.text
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn submitted_at_ms(&self) -> u64 {
        self.id.submitted_at_ms
    }
}

/// Lifecycle state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl QueryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryState::Pending => "pending",
            QueryState::Processing => "processing",
            QueryState::Completed => "completed",
            QueryState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Completed | QueryState::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: QueryState) -> bool {
        matches!(
            (self, next),
            (QueryState::Pending, QueryState::Processing)
                | (QueryState::Pending, QueryState::Failed)
                | (QueryState::Processing, QueryState::Completed)
                | (QueryState::Processing, QueryState::Failed)
        )
    }
}

impl std::fmt::Display for QueryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a query ended in the `failed` state
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum QueryFailure {
    #[error("no usable responses ({timed_out} timed out, {errored} errored)")]
    NoUsableResponses { timed_out: usize, errored: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// A requested change of lifecycle state
#[derive(Debug, Clone)]
pub enum QueryTransition {
    /// Responder calls are being dispatched
    Dispatch,
    /// The verdict produced a reportable answer
    Complete(AnalysisResult),
    /// The query cannot produce an answer
    Fail(QueryFailure),
}

impl QueryTransition {
    pub fn target(&self) -> QueryState {
        match self {
            QueryTransition::Dispatch => QueryState::Processing,
            QueryTransition::Complete(_) => QueryState::Completed,
            QueryTransition::Fail(_) => QueryState::Failed,
        }
    }
}

/// Registry entry for a query: the query plus its lifecycle state and
/// terminal artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query: Query,
    pub state: QueryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<QueryFailure>,
    /// Timestamp of the last state change (milliseconds since epoch)
    pub updated_at_ms: u64,
}

impl QueryRecord {
    /// A freshly submitted query
    pub fn pending(query: Query) -> Self {
        let updated_at_ms = query.submitted_at_ms();
        Self {
            query,
            state: QueryState::Pending,
            result: None,
            failure: None,
            updated_at_ms,
        }
    }

    pub fn id(&self) -> &QueryId {
        self.query.id()
    }

    /// Apply a lifecycle transition
    ///
    /// Rejects transitions out of terminal states and completions carrying a
    /// `failed` verdict, so a completed record always holds a reportable
    /// result and a failed one never does.
    pub fn apply(&mut self, transition: QueryTransition) -> Result<QueryState, DomainError> {
        let next = transition.target();
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        match transition {
            QueryTransition::Dispatch => {}
            QueryTransition::Complete(result) => {
                if result.status == VerificationStatus::Failed {
                    return Err(DomainError::InvalidTransition {
                        from: self.state.to_string(),
                        to: "completed (with failed verdict)".to_string(),
                    });
                }
                self.result = Some(result);
            }
            QueryTransition::Fail(failure) => {
                self.failure = Some(failure);
            }
        }

        self.state = next;
        self.updated_at_ms = current_timestamp_ms();
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::outcome::{ResponderOutcome, ResponseSet};

    fn sample_query() -> Query {
        Query::new(
            QueryId::new(1_700_000_000_000, 7, "k3x9a"),
            QueryText::new("What is the population of Tokyo?").unwrap(),
            QueryOptions::default(),
        )
    }

    fn result_with(status: VerificationStatus) -> AnalysisResult {
        AnalysisResult {
            consensus: "answer".to_string(),
            confidence_score: 90,
            hallucination_risk: 5,
            status,
            agreement_ratio: 1.0,
            participation_ratio: 1.0,
            groups: vec![],
            responses: ResponseSet::new(
                1,
                vec![ResponderOutcome::ok("miner-1", "answer", 90.0, 4.0, 10)],
                10,
            ),
            elapsed_ms: 10,
        }
    }

    #[test]
    fn test_query_id_roundtrip_and_display() {
        let id = QueryId::new(1_700_000_000_000, 7, "k3x9a");
        assert_eq!(id.to_string(), "query_1700000000000_7_k3x9a");
        assert_eq!(id.to_string().parse::<QueryId>().unwrap(), id);
    }

    #[test]
    fn test_query_id_rejects_garbage() {
        assert!("nope".parse::<QueryId>().is_err());
        assert!("query_abc_1_x".parse::<QueryId>().is_err());
        assert!("query_1_2_".parse::<QueryId>().is_err());
        assert!("query_1_2_a-b".parse::<QueryId>().is_err());
    }

    #[test]
    fn test_query_id_ordering() {
        let a = QueryId::new(100, 5, "zzz");
        let b = QueryId::new(100, 6, "aaa");
        let c = QueryId::new(101, 0, "aaa");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut record = QueryRecord::pending(sample_query());
        assert_eq!(record.state, QueryState::Pending);

        record.apply(QueryTransition::Dispatch).unwrap();
        assert_eq!(record.state, QueryState::Processing);

        let state = record
            .apply(QueryTransition::Complete(result_with(
                VerificationStatus::Disputed,
            )))
            .unwrap();
        assert_eq!(state, QueryState::Completed);
        assert!(record.result.is_some());
        assert!(record.failure.is_none());
    }

    #[test]
    fn test_cannot_complete_from_pending() {
        let mut record = QueryRecord::pending(sample_query());
        let err = record
            .apply(QueryTransition::Complete(result_with(
                VerificationStatus::Verified,
            )))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(record.state, QueryState::Pending);
    }

    #[test]
    fn test_completion_rejects_failed_verdict() {
        let mut record = QueryRecord::pending(sample_query());
        record.apply(QueryTransition::Dispatch).unwrap();
        assert!(
            record
                .apply(QueryTransition::Complete(result_with(
                    VerificationStatus::Failed
                )))
                .is_err()
        );
        assert_eq!(record.state, QueryState::Processing);
        assert!(record.result.is_none());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut record = QueryRecord::pending(sample_query());
        record
            .apply(QueryTransition::Fail(QueryFailure::InvalidConfiguration {
                message: "no responders".to_string(),
            }))
            .unwrap();
        assert_eq!(record.state, QueryState::Failed);

        assert!(record.apply(QueryTransition::Dispatch).is_err());
        assert!(
            record
                .apply(QueryTransition::Fail(QueryFailure::NoUsableResponses {
                    timed_out: 1,
                    errored: 0,
                }))
                .is_err()
        );
        assert!(matches!(
            record.failure,
            Some(QueryFailure::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_state_machine_table() {
        use QueryState::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Completed));
        assert!(Completed.is_terminal() && Failed.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn test_failure_display() {
        let failure = QueryFailure::NoUsableResponses {
            timed_out: 2,
            errored: 1,
        };
        assert_eq!(
            failure.to_string(),
            "no usable responses (2 timed out, 1 errored)"
        );
    }
}
