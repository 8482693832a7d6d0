//! Default query options from TOML (`[query]` section)

use super::ConfigValidationError;
use oracle_domain::{QueryKind, QueryOptions};
use serde::{Deserialize, Serialize};

/// Raw query defaults from TOML
///
/// `kind` stays a string so that aliases such as `"calc"` are accepted and
/// an unknown value is reported by `validate` instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    pub kind: String,
    pub responder_count: usize,
    pub consensus_threshold: f64,
    pub timeout_ms: u64,
}

impl Default for FileQueryConfig {
    fn default() -> Self {
        let options = QueryOptions::default();
        Self {
            kind: options.kind.to_string(),
            responder_count: options.responder_count,
            consensus_threshold: options.consensus_threshold,
            timeout_ms: options.timeout_ms,
        }
    }
}

impl FileQueryConfig {
    pub fn parse_kind(&self) -> Result<QueryKind, ConfigValidationError> {
        self.kind
            .parse()
            .map_err(|_| ConfigValidationError::UnknownQueryKind(self.kind.clone()))
    }

    pub fn to_options(&self) -> Result<QueryOptions, ConfigValidationError> {
        Ok(QueryOptions {
            kind: self.parse_kind()?,
            responder_count: self.responder_count,
            consensus_threshold: self.consensus_threshold,
            timeout_ms: self.timeout_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let options = FileQueryConfig::default().to_options().unwrap();
        assert_eq!(options, QueryOptions::default());
    }

    #[test]
    fn test_query_deserialize() {
        let toml_str = r#"
[query]
kind = "calc"
responder_count = 5
timeout_ms = 10000
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let options = config.query.to_options().unwrap();
        assert_eq!(options.kind, QueryKind::Calculation);
        assert_eq!(options.responder_count, 5);
        assert_eq!(options.consensus_threshold, 0.8);
        assert_eq!(options.timeout_ms, 10000);
    }

    #[test]
    fn test_unknown_kind() {
        let config = FileQueryConfig {
            kind: "rumor".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.to_options(),
            Err(ConfigValidationError::UnknownQueryKind(kind)) if kind == "rumor"
        ));
    }
}
