//! Query value objects - the validated inputs of a consensus query.
//!
//! - [`QueryKind`] - what sort of answer is being asked for
//! - [`QueryText`] - the question itself, trimmed and length-bounded
//! - [`QueryOptions`] - responder count, consensus threshold and deadline

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum query length in characters
pub const MAX_QUERY_CHARS: usize = 1000;

/// Smallest accepted deadline
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Accepted consensus threshold range (inclusive)
pub const CONSENSUS_THRESHOLD_RANGE: (f64, f64) = (0.5, 1.0);

/// Kind of question being asked
///
/// The kind is forwarded to every responder so it can adapt its answer
/// (e.g. a calculation should come back as a number, a prediction with caveats).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Verifiable factual information
    #[default]
    Fact,
    /// Subjective analysis and viewpoints
    Opinion,
    /// Mathematical computation
    Calculation,
    /// Forecast about future events
    Prediction,
}

impl QueryKind {
    /// All query kinds in display order
    pub fn all() -> [QueryKind; 4] {
        [
            QueryKind::Fact,
            QueryKind::Opinion,
            QueryKind::Calculation,
            QueryKind::Prediction,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Fact => "fact",
            QueryKind::Opinion => "opinion",
            QueryKind::Calculation => "calculation",
            QueryKind::Prediction => "prediction",
        }
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            QueryKind::Fact => "Verifiable factual information",
            QueryKind::Opinion => "Subjective analysis and perspectives",
            QueryKind::Calculation => "Mathematical computations",
            QueryKind::Prediction => "Future forecasts and trends",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fact" => Ok(QueryKind::Fact),
            "opinion" => Ok(QueryKind::Opinion),
            "calculation" | "calc" => Ok(QueryKind::Calculation),
            "prediction" => Ok(QueryKind::Prediction),
            other => Err(format!(
                "Unknown query kind: {}. Valid: fact, opinion, calculation, prediction",
                other
            )),
        }
    }
}

/// The text of a query (Value Object)
///
/// Always non-empty after trimming and at most [`MAX_QUERY_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueryText(String);

impl QueryText {
    /// Validate and create query text. Surrounding whitespace is removed.
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidQuery(
                "query text cannot be empty".to_string(),
            ));
        }

        let chars = trimmed.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(DomainError::InvalidQuery(format!(
                "query text is {} characters, maximum is {}",
                chars, MAX_QUERY_CHARS
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for QueryText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QueryText> for String {
    fn from(value: QueryText) -> Self {
        value.0
    }
}

/// Per-query options
///
/// # Example
///
/// ```
/// use oracle_domain::query::{QueryKind, QueryOptions};
///
/// let options = QueryOptions::default()
///     .with_kind(QueryKind::Calculation)
///     .with_responder_count(5);
/// assert!(options.validate().is_ok());
///
/// let bad = QueryOptions::default().with_consensus_threshold(0.3);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Kind of question
    pub kind: QueryKind,
    /// Number of responders to consult (K)
    pub responder_count: usize,
    /// Minimum agreement ratio for a verified answer (T)
    pub consensus_threshold: f64,
    /// Overall deadline in milliseconds (D)
    pub timeout_ms: u64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            kind: QueryKind::Fact,
            responder_count: 3,
            consensus_threshold: 0.8,
            timeout_ms: 30_000,
        }
    }
}

impl QueryOptions {
    pub fn with_kind(mut self, kind: QueryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_responder_count(mut self, count: usize) -> Self {
        self.responder_count = count;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The overall deadline as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check every option against its accepted range
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.responder_count < 1 {
            return Err(DomainError::InvalidConfiguration(
                "responder_count must be at least 1".to_string(),
            ));
        }

        let (min, max) = CONSENSUS_THRESHOLD_RANGE;
        if !(min..=max).contains(&self.consensus_threshold) {
            return Err(DomainError::InvalidConfiguration(format!(
                "consensus_threshold must be within [{}, {}], got {}",
                min, max, self.consensus_threshold
            )));
        }

        if self.timeout_ms < MIN_TIMEOUT_MS {
            return Err(DomainError::InvalidConfiguration(format!(
                "timeout_ms must be at least {}, got {}",
                MIN_TIMEOUT_MS, self.timeout_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_trims() {
        let text = QueryText::new("  What is Rust?  ").unwrap();
        assert_eq!(text.as_str(), "What is Rust?");
    }

    #[test]
    fn test_query_text_rejects_empty() {
        assert!(QueryText::new("").is_err());
        assert!(QueryText::new("   \n").is_err());
    }

    #[test]
    fn test_query_text_length_bound() {
        let at_limit = "a".repeat(MAX_QUERY_CHARS);
        assert!(QueryText::new(at_limit).is_ok());

        let over = "a".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(
            QueryText::new(over),
            Err(DomainError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_query_text_counts_characters_not_bytes() {
        let kanji = "東".repeat(MAX_QUERY_CHARS);
        assert!(QueryText::new(kanji).is_ok());
    }

    #[test]
    fn test_query_kind_parse() {
        assert_eq!("fact".parse::<QueryKind>().ok(), Some(QueryKind::Fact));
        assert_eq!(
            "Prediction".parse::<QueryKind>().ok(),
            Some(QueryKind::Prediction)
        );
        assert_eq!(
            "calc".parse::<QueryKind>().ok(),
            Some(QueryKind::Calculation)
        );
        assert!("rumour".parse::<QueryKind>().is_err());
    }

    #[test]
    fn test_query_kind_serde_lowercase() {
        let json = serde_json::to_string(&QueryKind::Opinion).unwrap();
        assert_eq!(json, "\"opinion\"");
    }

    #[test]
    fn test_default_options_are_valid() {
        let options = QueryOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.responder_count, 3);
        assert_eq!(options.consensus_threshold, 0.8);
        assert_eq!(options.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_options_validation() {
        let zero = QueryOptions::default().with_responder_count(0);
        assert!(zero.validate().unwrap_err().is_configuration());

        let low = QueryOptions::default().with_consensus_threshold(0.49);
        assert!(low.validate().is_err());

        let high = QueryOptions::default().with_consensus_threshold(1.01);
        assert!(high.validate().is_err());

        let nan = QueryOptions::default().with_consensus_threshold(f64::NAN);
        assert!(nan.validate().is_err());

        let short = QueryOptions::default().with_timeout_ms(999);
        assert!(short.validate().is_err());

        let edges = QueryOptions::default()
            .with_consensus_threshold(0.5)
            .with_timeout_ms(MIN_TIMEOUT_MS);
        assert!(edges.validate().is_ok());
    }
}
