//! Simulated responder definitions from TOML (`[[responders]]` array)
//!
//! ```toml
//! [[responders]]
//! id = "miner-1"
//! reputation = 4.8      # 0-5
//! confidence = 96       # self-reported, 0-100
//! latency_ms = 400
//! behavior = "answer"   # answer | fixed | error | hang
//!
//! [[responders]]
//! id = "miner-2"
//! behavior = "fixed"
//! answer = "Tokyo has about 14 million residents."
//! ```

use super::ConfigValidationError;
use crate::responders::ResponderBehavior;
use oracle_domain::consensus::outcome::{MAX_CONFIDENCE, MAX_REPUTATION};
use serde::{Deserialize, Serialize};

/// One simulated responder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResponderConfig {
    pub id: String,
    pub reputation: f64,
    pub confidence: f64,
    pub latency_ms: u64,
    pub behavior: String,
    /// Answer text for `fixed`, error message for `error`
    pub answer: Option<String>,
}

impl Default for FileResponderConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            reputation: 4.0,
            confidence: 90.0,
            latency_ms: 500,
            behavior: "answer".to_string(),
            answer: None,
        }
    }
}

impl FileResponderConfig {
    pub fn parse_behavior(&self) -> Result<ResponderBehavior, ConfigValidationError> {
        match self.behavior.trim().to_lowercase().as_str() {
            "answer" => Ok(ResponderBehavior::Answer),
            "fixed" => match &self.answer {
                Some(text) if !text.trim().is_empty() => Ok(ResponderBehavior::Fixed(text.clone())),
                _ => Err(ConfigValidationError::MissingFixedAnswer(self.id.clone())),
            },
            "error" => Ok(ResponderBehavior::Error(
                self.answer
                    .clone()
                    .unwrap_or_else(|| "simulated failure".to_string()),
            )),
            "hang" => Ok(ResponderBehavior::Hang),
            other => Err(ConfigValidationError::UnknownBehavior {
                responder: self.id.clone(),
                value: other.to_string(),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.id.trim().is_empty() {
            return Err(ConfigValidationError::EmptyResponderId);
        }
        if !(0.0..=MAX_REPUTATION).contains(&self.reputation) {
            return Err(ConfigValidationError::ReputationOutOfRange {
                responder: self.id.clone(),
                value: self.reputation,
            });
        }
        if !(0.0..=MAX_CONFIDENCE).contains(&self.confidence) {
            return Err(ConfigValidationError::ConfidenceOutOfRange {
                responder: self.id.clone(),
                value: self.confidence,
            });
        }
        self.parse_behavior().map(|_| ())
    }
}
