//! Responder client port
//!
//! Defines the interface for asking one responder one question.
//! The transport (HTTP, RPC, simulated) lives behind this trait.

use async_trait::async_trait;
use oracle_domain::QueryKind;
use oracle_domain::consensus::outcome::MAX_REPUTATION;
use std::sync::Arc;
use thiserror::Error;

/// Errors a responder can return
#[derive(Error, Debug, Clone)]
pub enum ResponderError {
    #[error("Responder unavailable: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// What a responder returns for a query
#[derive(Debug, Clone, PartialEq)]
pub struct ResponderAnswer {
    /// Answer text
    pub text: String,
    /// Self-reported confidence, nominally 0-100
    pub self_confidence: f64,
}

impl ResponderAnswer {
    pub fn new(text: impl Into<String>, self_confidence: f64) -> Self {
        Self {
            text: text.into(),
            self_confidence,
        }
    }
}

/// Client for a single responder
///
/// Calls may fail, or never resolve at all; the response collector bounds
/// every call with the query deadline.
#[async_trait]
pub trait ResponderClient: Send + Sync {
    /// Stable responder identifier (e.g., "miner-1")
    fn id(&self) -> &str;

    /// Ask the responder a question
    async fn ask(&self, query_text: &str, kind: QueryKind)
    -> Result<ResponderAnswer, ResponderError>;
}

/// A responder selected for a query, with its externally supplied reputation
#[derive(Clone)]
pub struct ResponderHandle {
    client: Arc<dyn ResponderClient>,
    reputation: f64,
}

impl ResponderHandle {
    /// Reputation is clamped to [0, 5]
    pub fn new(client: Arc<dyn ResponderClient>, reputation: f64) -> Self {
        let reputation = if reputation.is_nan() {
            0.0
        } else {
            reputation.clamp(0.0, MAX_REPUTATION)
        };
        Self { client, reputation }
    }

    pub fn id(&self) -> &str {
        self.client.id()
    }

    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    pub fn client(&self) -> Arc<dyn ResponderClient> {
        Arc::clone(&self.client)
    }
}

impl std::fmt::Debug for ResponderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponderHandle")
            .field("id", &self.id())
            .field("reputation", &self.reputation)
            .finish()
    }
}
