//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod engine;
mod output;
mod query;
mod responders;

pub use engine::FileEngineConfig;
pub use output::FileOutputConfig;
pub use query::FileQueryConfig;
pub use responders::FileResponderConfig;

use oracle_application::EngineConfig;
use oracle_domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("[engine] {0}")]
    Engine(DomainError),

    #[error("[query] {0}")]
    Query(DomainError),

    #[error("[query] unknown kind '{0}' (expected fact, opinion, calculation or prediction)")]
    UnknownQueryKind(String),

    #[error("responder id cannot be empty")]
    EmptyResponderId,

    #[error("responder id '{0}' is defined more than once")]
    DuplicateResponderId(String),

    #[error("responder '{responder}': unknown behavior '{value}' (expected answer, fixed, error or hang)")]
    UnknownBehavior { responder: String, value: String },

    #[error("responder '{0}': behavior \"fixed\" requires a non-empty answer")]
    MissingFixedAnswer(String),

    #[error("responder '{responder}': reputation {value} is outside [0, 5]")]
    ReputationOutOfRange { responder: String, value: f64 },

    #[error("responder '{responder}': confidence {value} is outside [0, 100]")]
    ConfidenceOutOfRange { responder: String, value: f64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Clustering and scoring constants
    pub engine: FileEngineConfig,
    /// Defaults for query options
    pub query: FileQueryConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Simulated responders; empty means the built-in default pool
    pub responders: Vec<FileResponderConfig>,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.engine
            .to_params()
            .validate()
            .map_err(ConfigValidationError::Engine)?;

        self.query
            .to_options()?
            .validate()
            .map_err(ConfigValidationError::Query)?;

        let mut seen = HashSet::new();
        for responder in &self.responders {
            responder.validate()?;
            if !seen.insert(responder.id.as_str()) {
                return Err(ConfigValidationError::DuplicateResponderId(
                    responder.id.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Convert into the engine's configuration
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigValidationError> {
        Ok(EngineConfig::new(
            self.engine.to_params(),
            self.query.to_options()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_domain::{OutputFormat, QueryKind};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[engine]
similarity_threshold = 0.7
min_participation = 0.6

[query]
kind = "prediction"
responder_count = 4
consensus_threshold = 0.9

[output]
format = "full"
color = false

[[responders]]
id = "miner-a"
reputation = 4.5
latency_ms = 200

[[responders]]
id = "miner-b"
behavior = "error"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let engine = config.to_engine_config().unwrap();
        assert_eq!(engine.consensus().similarity_threshold, 0.7);
        assert_eq!(engine.consensus().min_participation, 0.6);
        assert_eq!(engine.query_defaults().kind, QueryKind::Prediction);
        assert_eq!(engine.query_defaults().responder_count, 4);
        assert_eq!(engine.query_defaults().timeout_ms, 30_000);

        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert_eq!(config.responders.len(), 2);
        assert_eq!(config.responders[1].latency_ms, 500);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.responders.is_empty());
        assert!(config.output.color);
        assert_eq!(config.to_engine_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_validate_engine_range() {
        let toml_str = r#"
[engine]
similarity_threshold = 1.5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Engine(_))
        ));
    }

    #[test]
    fn test_validate_query_defaults() {
        let toml_str = r#"
[query]
timeout_ms = 10
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigValidationError::Query(_)));
        assert!(err.to_string().starts_with("[query]"));
    }

    #[test]
    fn test_validate_duplicate_responders() {
        let toml_str = r#"
[[responders]]
id = "miner-1"

[[responders]]
id = "miner-1"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DuplicateResponderId(
                "miner-1".to_string()
            ))
        );
    }
}
