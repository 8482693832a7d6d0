//! Engine configuration from TOML (`[engine]` section)
//!
//! ```toml
//! [engine]
//! similarity_threshold = 0.6      # agreement needed to share a group
//! risk_penalty_per_group = 0.25   # risk growth per losing group
//! min_participation = 0.5         # share of responders that must answer
//! ```

use oracle_domain::ConsensusParams;
use serde::{Deserialize, Serialize};

/// Raw engine configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEngineConfig {
    pub similarity_threshold: f64,
    pub risk_penalty_per_group: f64,
    pub min_participation: f64,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        let params = ConsensusParams::default();
        Self {
            similarity_threshold: params.similarity_threshold,
            risk_penalty_per_group: params.risk_penalty_per_group,
            min_participation: params.min_participation,
        }
    }
}

impl FileEngineConfig {
    pub fn to_params(&self) -> ConsensusParams {
        ConsensusParams::default()
            .with_similarity_threshold(self.similarity_threshold)
            .with_risk_penalty_per_group(self.risk_penalty_per_group)
            .with_min_participation(self.min_participation)
    }
}
