//! Deterministic simulated responders
//!
//! Used by the CLI when no real responder network is configured, and as a
//! scriptable fake in tests.

use super::catalog::canned_answer;
use async_trait::async_trait;
use oracle_application::{ResponderAnswer, ResponderClient, ResponderError};
use oracle_domain::QueryKind;
use std::time::Duration;
use tracing::debug;

/// How a simulated responder reacts to a query
#[derive(Debug, Clone, PartialEq)]
pub enum ResponderBehavior {
    /// Answer from the canned catalogue
    Answer,
    /// Always give this answer
    Fixed(String),
    /// Always fail with this message
    Error(String),
    /// Never resolve
    Hang,
}

/// A [`ResponderClient`] with fixed latency, confidence and behaviour
#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    id: String,
    latency: Duration,
    confidence: f64,
    behavior: ResponderBehavior,
}

impl SimulatedResponder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            latency: Duration::from_millis(500),
            confidence: 90.0,
            behavior: ResponderBehavior::Answer,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_behavior(mut self, behavior: ResponderBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn behavior(&self) -> &ResponderBehavior {
        &self.behavior
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl ResponderClient for SimulatedResponder {
    fn id(&self) -> &str {
        &self.id
    }

    async fn ask(
        &self,
        query_text: &str,
        kind: QueryKind,
    ) -> Result<ResponderAnswer, ResponderError> {
        if self.behavior == ResponderBehavior::Hang {
            debug!(responder = %self.id, "Simulated responder hanging");
            return std::future::pending().await;
        }

        tokio::time::sleep(self.latency).await;

        match &self.behavior {
            ResponderBehavior::Answer => Ok(ResponderAnswer::new(
                canned_answer(query_text, kind),
                self.confidence,
            )),
            ResponderBehavior::Fixed(text) => {
                Ok(ResponderAnswer::new(text.clone(), self.confidence))
            }
            ResponderBehavior::Error(message) => {
                Err(ResponderError::Unavailable(message.clone()))
            }
            ResponderBehavior::Hang => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_answer_after_latency() {
        let responder = SimulatedResponder::new("miner-1")
            .with_latency(Duration::from_millis(800))
            .with_confidence(95.0);

        let started = Instant::now();
        let answer = responder
            .ask("What is the population of Tokyo?", QueryKind::Fact)
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(800));
        assert!(answer.text.contains("Tokyo"));
        assert_eq!(answer.self_confidence, 95.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_and_error_behaviors() {
        let fixed = SimulatedResponder::new("miner-1")
            .with_behavior(ResponderBehavior::Fixed("Lyon".to_string()));
        let answer = fixed
            .ask("Capital of France?", QueryKind::Fact)
            .await
            .unwrap();
        assert_eq!(answer.text, "Lyon");

        let failing = SimulatedResponder::new("miner-2")
            .with_behavior(ResponderBehavior::Error("node offline".to_string()));
        let err = failing
            .ask("Capital of France?", QueryKind::Fact)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("node offline"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_never_resolves() {
        let responder =
            SimulatedResponder::new("miner-1").with_behavior(ResponderBehavior::Hang);
        let result = tokio::time::timeout(
            Duration::from_secs(60),
            responder.ask("Anything?", QueryKind::Fact),
        )
        .await;
        assert!(result.is_err());
    }
}
