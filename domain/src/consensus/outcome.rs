//! Responder outcomes and the frozen response set of a query.

use serde::{Deserialize, Serialize};

/// Maximum responder reputation
pub const MAX_REPUTATION: f64 = 5.0;

/// Maximum self-reported confidence
pub const MAX_CONFIDENCE: f64 = 100.0;

/// How a single responder call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Answered before the deadline
    Ok,
    /// Still outstanding when the deadline expired
    Timeout,
    /// Returned a fault before the deadline
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::Timeout => "timeout",
            OutcomeStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of asking one responder (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderOutcome {
    /// Responder identifier (e.g., "miner-1")
    pub responder: String,
    pub status: OutcomeStatus,
    /// Answer text, present only when `status` is `Ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Self-reported confidence in [0, 100], present only when `status` is `Ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Externally supplied reputation in [0, 5]
    pub reputation: f64,
    /// Time from dispatch to resolution (or to the deadline)
    pub elapsed_ms: u64,
    /// Fault description, present only when `status` is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponderOutcome {
    /// A usable answer. Confidence and reputation are clamped to their ranges.
    pub fn ok(
        responder: impl Into<String>,
        text: impl Into<String>,
        confidence: f64,
        reputation: f64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            responder: responder.into(),
            status: OutcomeStatus::Ok,
            text: Some(text.into()),
            confidence: Some(clamp_or_zero(confidence, MAX_CONFIDENCE)),
            reputation: clamp_or_zero(reputation, MAX_REPUTATION),
            elapsed_ms,
            error: None,
        }
    }

    /// The responder returned a fault
    pub fn error(
        responder: impl Into<String>,
        error: impl Into<String>,
        reputation: f64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            responder: responder.into(),
            status: OutcomeStatus::Error,
            text: None,
            confidence: None,
            reputation: clamp_or_zero(reputation, MAX_REPUTATION),
            elapsed_ms,
            error: Some(error.into()),
        }
    }

    /// The responder was cut off by the deadline
    pub fn timeout(responder: impl Into<String>, reputation: f64, elapsed_ms: u64) -> Self {
        Self {
            responder: responder.into(),
            status: OutcomeStatus::Timeout,
            text: None,
            confidence: None,
            reputation: clamp_or_zero(reputation, MAX_REPUTATION),
            elapsed_ms,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OutcomeStatus::Ok
    }

    /// Voting weight: reputation × self-confidence, zero unless `Ok`
    pub fn weight(&self) -> f64 {
        match (self.status, self.confidence) {
            (OutcomeStatus::Ok, Some(confidence)) => self.reputation * confidence,
            _ => 0.0,
        }
    }
}

fn clamp_or_zero(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

/// All outcomes for one query, in arrival order
///
/// Built once by the response collector when collection ends and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSet {
    solicited: usize,
    outcomes: Vec<ResponderOutcome>,
    wall_time_ms: u64,
}

impl ResponseSet {
    /// Freeze a set of outcomes
    ///
    /// * `solicited` - number of responders the query was sent to (K)
    /// * `outcomes` - outcomes in arrival order
    /// * `wall_time_ms` - collector wall time
    pub fn new(solicited: usize, outcomes: Vec<ResponderOutcome>, wall_time_ms: u64) -> Self {
        Self {
            solicited,
            outcomes,
            wall_time_ms,
        }
    }

    pub fn solicited(&self) -> usize {
        self.solicited
    }

    pub fn outcomes(&self) -> &[ResponderOutcome] {
        &self.outcomes
    }

    pub fn get(&self, index: usize) -> Option<&ResponderOutcome> {
        self.outcomes.get(index)
    }

    pub fn wall_time_ms(&self) -> u64 {
        self.wall_time_ms
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Ok outcomes with their arrival index
    pub fn ok_outcomes(&self) -> impl Iterator<Item = (usize, &ResponderOutcome)> {
        self.outcomes.iter().enumerate().filter(|(_, o)| o.is_ok())
    }

    pub fn ok_count(&self) -> usize {
        self.count_status(OutcomeStatus::Ok)
    }

    pub fn timeout_count(&self) -> usize {
        self.count_status(OutcomeStatus::Timeout)
    }

    pub fn error_count(&self) -> usize {
        self.count_status(OutcomeStatus::Error)
    }

    fn count_status(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Σ reputation × confidence over ok outcomes
    pub fn total_weight(&self) -> f64 {
        self.outcomes.iter().map(ResponderOutcome::weight).sum()
    }

    /// Fraction of solicited responders that returned a usable answer (P)
    pub fn participation_ratio(&self) -> f64 {
        if self.solicited == 0 {
            0.0
        } else {
            self.ok_count() as f64 / self.solicited as f64
        }
    }
}
