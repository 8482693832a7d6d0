//! Tunable constants of the consensus engine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Parameters shared by clustering and scoring
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `similarity_threshold` | 0.6 | Minimum agreement for two answers to share a group (S) |
/// | `risk_penalty_per_group` | 0.25 | Hallucination-risk multiplier added per losing group (α) |
/// | `min_participation` | 0.5 | Participation ratio required for a verified verdict |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusParams {
    pub similarity_threshold: f64,
    pub risk_penalty_per_group: f64,
    pub min_participation: f64,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            risk_penalty_per_group: 0.25,
            min_participation: 0.5,
        }
    }
}

impl ConsensusParams {
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_risk_penalty_per_group(mut self, penalty: f64) -> Self {
        self.risk_penalty_per_group = penalty;
        self
    }

    pub fn with_min_participation(mut self, floor: f64) -> Self {
        self.min_participation = floor;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(DomainError::InvalidConfiguration(format!(
                "similarity_threshold must be within (0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if !(self.risk_penalty_per_group >= 0.0 && self.risk_penalty_per_group.is_finite()) {
            return Err(DomainError::InvalidConfiguration(format!(
                "risk_penalty_per_group must be a non-negative number, got {}",
                self.risk_penalty_per_group
            )));
        }

        if !(0.0..=1.0).contains(&self.min_participation) {
            return Err(DomainError::InvalidConfiguration(format!(
                "min_participation must be within [0, 1], got {}",
                self.min_participation
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ConsensusParams::default();
        assert_eq!(params.similarity_threshold, 0.6);
        assert_eq!(params.risk_penalty_per_group, 0.25);
        assert_eq!(params.min_participation, 0.5);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let base = ConsensusParams::default();
        assert!(base.with_similarity_threshold(0.0).validate().is_err());
        assert!(base.with_similarity_threshold(1.0).validate().is_ok());
        assert!(base.with_risk_penalty_per_group(-0.1).validate().is_err());
        assert!(base.with_risk_penalty_per_group(f64::INFINITY).validate().is_err());
        assert!(base.with_min_participation(1.5).validate().is_err());
        assert!(base.with_min_participation(0.0).validate().is_ok());
    }
}
