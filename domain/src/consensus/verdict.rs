//! Verdict scoring
//!
//! Turns the consensus groups of a query into its [`AnalysisResult`].
//!
//! With `W` the summed weight of all ok-outcomes, `R = winner.weight / W`
//! (0 when `W` is 0) and `P = ok / K`:
//!
//! ```text
//! confidence         = round(100 × R × P)
//! hallucination risk = round(100 × min(1, (1 − R) × (1 + α × losing_groups)))
//! status             = failed    if ok = 0
//!                      verified  if R ≥ T and P ≥ min_participation
//!                      disputed  otherwise
//! ```

use super::aggregator::ConsensusGroup;
use super::outcome::ResponseSet;
use super::params::ConsensusParams;
use crate::query::Query;
use serde::{Deserialize, Serialize};

/// Tolerance for threshold comparisons on computed ratios
const RATIO_EPSILON: f64 = 1e-9;

/// Final trust classification of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Enough responders answered and enough of them agree
    Verified,
    /// Usable answers exist but agreement or participation is too low
    Disputed,
    /// No usable answer at all
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Disputed => "disputed",
            VerificationStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal artifact of a completed query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Representative text of the winning group (empty when failed)
    pub consensus: String,
    /// 0-100
    pub confidence_score: u8,
    /// 0-100
    pub hallucination_risk: u8,
    pub status: VerificationStatus,
    /// R
    pub agreement_ratio: f64,
    /// P
    pub participation_ratio: f64,
    /// Consensus groups, winner first
    pub groups: Vec<ConsensusGroup>,
    /// Every responder outcome, in arrival order
    pub responses: ResponseSet,
    /// Collector wall time, capped at the query deadline
    pub elapsed_ms: u64,
}

impl AnalysisResult {
    /// Number of groups that lost to the winner
    pub fn competing_groups(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }

    pub fn winner(&self) -> Option<&ConsensusGroup> {
        self.groups.first()
    }
}

/// Builds [`AnalysisResult`]s; a pure function of its inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictBuilder {
    params: ConsensusParams,
}

impl VerdictBuilder {
    pub fn new(params: ConsensusParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Score a frozen response set
    ///
    /// `groups` must come from clustering `responses`, heaviest first.
    pub fn build(
        &self,
        query: &Query,
        responses: ResponseSet,
        groups: Vec<ConsensusGroup>,
    ) -> AnalysisResult {
        let options = query.options();
        let ok_count = responses.ok_count();
        let participation = responses.participation_ratio();
        let agreement = Self::agreement_ratio(&responses, &groups);

        let confidence = to_score(agreement * participation);

        let losing = groups.len().saturating_sub(1) as f64;
        let penalty = 1.0 + self.params.risk_penalty_per_group * losing;
        let mut risk = to_score(((1.0 - agreement) * penalty).min(1.0));
        if groups.len() > 1 {
            // A competing group, however light, is never zero risk
            risk = risk.max(1);
        }

        let status = if ok_count == 0 {
            VerificationStatus::Failed
        } else if agreement + RATIO_EPSILON >= options.consensus_threshold
            && participation + RATIO_EPSILON >= self.params.min_participation
        {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Disputed
        };

        let consensus = groups
            .first()
            .map(|g| g.representative.clone())
            .unwrap_or_default();
        let elapsed_ms = responses.wall_time_ms().min(options.timeout_ms);

        AnalysisResult {
            consensus,
            confidence_score: confidence,
            hallucination_risk: risk,
            status,
            agreement_ratio: agreement,
            participation_ratio: participation,
            groups,
            responses,
            elapsed_ms,
        }
    }

    /// R: the winning group's share of all usable weight
    fn agreement_ratio(responses: &ResponseSet, groups: &[ConsensusGroup]) -> f64 {
        let total = responses.total_weight();
        let Some(winner) = groups.first() else {
            return 0.0;
        };
        if total <= 0.0 {
            return 0.0;
        }

        if winner.len() == responses.ok_count() {
            1.0
        } else {
            (winner.weight / total).clamp(0.0, 1.0)
        }
    }
}

fn to_score(ratio: f64) -> u8 {
    (100.0 * ratio).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::aggregator::ConsensusAggregator;
    use crate::consensus::outcome::ResponderOutcome;
    use crate::query::{QueryId, QueryOptions, QueryText};

    const TOKYO_1: &str = "Tokyo has a population of about 14 million people in the city proper";
    const TOKYO_2: &str = "The population of Tokyo city proper is roughly 14 million people";
    const TOKYO_3: &str = "Approximately 14 million people live in Tokyo city proper";
    const OTHER: &str = "Osaka is the largest city in Japan by area";

    fn query(threshold: f64) -> Query {
        Query::new(
            QueryId::new(1, 0, "test"),
            QueryText::new("What is the population of Tokyo?").unwrap(),
            QueryOptions::default()
                .with_consensus_threshold(threshold)
                .with_timeout_ms(5000),
        )
    }

    fn verdict(threshold: f64, set: ResponseSet) -> AnalysisResult {
        let params = ConsensusParams::default();
        let groups = ConsensusAggregator::new(params.similarity_threshold).cluster(&set);
        VerdictBuilder::new(params).build(&query(threshold), set, groups)
    }

    #[test]
    fn test_tokyo_scenario_is_verified() {
        let set = ResponseSet::new(
            3,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 96.0, 4.8, 1800),
                ResponderOutcome::ok("miner-2", TOKYO_2, 92.0, 4.6, 2100),
                ResponderOutcome::ok("miner-3", TOKYO_3, 95.0, 4.9, 2000),
            ],
            2100,
        );
        let result = verdict(0.8, set);

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.status, VerificationStatus::Verified);
        assert_eq!(result.confidence_score, 100);
        assert_eq!(result.hallucination_risk, 0);
        // miner-3: 4.9 × 95 is the heaviest member
        assert_eq!(result.consensus, TOKYO_3);
        assert_eq!(result.elapsed_ms, 2100);
    }

    #[test]
    fn test_identical_answers_give_full_confidence() {
        let set = ResponseSet::new(
            4,
            (1..=4)
                .map(|i| ResponderOutcome::ok(format!("miner-{i}"), "42", 70.0, 3.0, 10))
                .collect(),
            10,
        );
        let result = verdict(1.0, set);
        assert_eq!(result.status, VerificationStatus::Verified);
        assert_eq!(result.confidence_score, 100);
        assert_eq!(result.hallucination_risk, 0);
        assert_eq!(result.agreement_ratio, 1.0);
    }

    #[test]
    fn test_one_timeout_two_agree() {
        let set = ResponseSet::new(
            3,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 800),
                ResponderOutcome::ok("miner-2", TOKYO_2, 90.0, 4.0, 900),
                ResponderOutcome::timeout("miner-3", 4.0, 5000),
            ],
            5000,
        );
        let result = verdict(0.8, set);

        assert_eq!(result.agreement_ratio, 1.0);
        assert!((result.participation_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.confidence_score, 67);
        assert_eq!(result.hallucination_risk, 0);
        assert_eq!(result.status, VerificationStatus::Verified);
    }

    #[test]
    fn test_participation_floor_blocks_verification() {
        // 1 of 3 answered: P = 1/3 < 0.5 even though R = 1
        let set = ResponseSet::new(
            3,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 800),
                ResponderOutcome::error("miner-2", "rate limited", 4.0, 100),
                ResponderOutcome::timeout("miner-3", 4.0, 5000),
            ],
            5000,
        );
        let result = verdict(0.5, set);
        assert_eq!(result.status, VerificationStatus::Disputed);
        assert_eq!(result.confidence_score, 33);
    }

    #[test]
    fn test_equal_split_is_disputed() {
        let set = ResponseSet::new(
            2,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 80.0, 4.0, 100),
                ResponderOutcome::ok("miner-2", OTHER, 80.0, 4.0, 100),
            ],
            100,
        );
        let result = verdict(0.55, set);

        assert_eq!(result.groups.len(), 2);
        assert_eq!(result.agreement_ratio, 0.5);
        assert_eq!(result.status, VerificationStatus::Disputed);
        assert_eq!(result.confidence_score, 50);
        // (1 − 0.5) × (1 + 0.25 × 1) = 0.625
        assert_eq!(result.hallucination_risk, 63);
        // Equal weight and size: the earliest arrival wins
        assert_eq!(result.consensus, TOKYO_1);
    }

    #[test]
    fn test_equal_split_verified_at_half_threshold() {
        let set = ResponseSet::new(
            2,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 80.0, 4.0, 100),
                ResponderOutcome::ok("miner-2", OTHER, 80.0, 4.0, 100),
            ],
            100,
        );
        assert_eq!(verdict(0.5, set).status, VerificationStatus::Verified);
    }

    #[test]
    fn test_all_timeouts_fail() {
        let set = ResponseSet::new(
            3,
            (1..=3)
                .map(|i| ResponderOutcome::timeout(format!("miner-{i}"), 4.0, 5000))
                .collect(),
            5000,
        );
        let result = verdict(0.8, set);
        assert_eq!(result.status, VerificationStatus::Failed);
        assert!(result.consensus.is_empty());
        assert!(result.groups.is_empty());
        assert_eq!(result.confidence_score, 0);
        assert_eq!(result.hallucination_risk, 100);
    }

    #[test]
    fn test_zero_weight_means_zero_agreement() {
        let set = ResponseSet::new(
            1,
            vec![ResponderOutcome::ok("miner-1", TOKYO_1, 0.0, 4.0, 100)],
            100,
        );
        let result = verdict(0.5, set);
        assert_eq!(result.agreement_ratio, 0.0);
        assert_eq!(result.status, VerificationStatus::Disputed);
    }

    #[test]
    fn test_elapsed_capped_at_deadline() {
        let set = ResponseSet::new(
            1,
            vec![ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 100)],
            9000,
        );
        assert_eq!(verdict(0.8, set).elapsed_ms, 5000);
    }

    #[test]
    fn test_risk_non_decreasing_as_agreement_falls() {
        // Two groups, P fixed at 1: shift weight from the winner to the loser
        let mut previous_risk = 1u8;
        for loser_confidence in [0.0, 10.0, 30.0, 50.0, 70.0, 90.0, 100.0] {
            let set = ResponseSet::new(
                2,
                vec![
                    ResponderOutcome::ok("miner-1", TOKYO_1, 100.0, 5.0, 100),
                    ResponderOutcome::ok("miner-2", OTHER, loser_confidence, 5.0, 100),
                ],
                100,
            );
            let result = verdict(0.8, set);
            assert!(
                result.hallucination_risk >= previous_risk,
                "risk fell from {} to {} at loser confidence {}",
                previous_risk,
                result.hallucination_risk,
                loser_confidence
            );
            previous_risk = result.hallucination_risk;
        }
        assert!(previous_risk > 0);
    }

    #[test]
    fn test_more_competing_groups_raise_risk() {
        let two_groups = ResponseSet::new(
            3,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 100),
                ResponderOutcome::ok("miner-2", TOKYO_2, 90.0, 4.0, 100),
                ResponderOutcome::ok("miner-3", OTHER, 90.0, 4.0, 100),
            ],
            100,
        );
        let three_groups = ResponseSet::new(
            4,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 100),
                ResponderOutcome::ok("miner-2", TOKYO_2, 90.0, 4.0, 100),
                ResponderOutcome::ok("miner-3", OTHER, 45.0, 4.0, 100),
                ResponderOutcome::ok("miner-4", "Twelve apples", 45.0, 4.0, 100),
            ],
            100,
        );

        let two = verdict(0.8, two_groups);
        let three = verdict(0.8, three_groups);
        // Same winner share R = 2/3 in both
        assert!((two.agreement_ratio - three.agreement_ratio).abs() < 1e-9);
        assert!(three.hallucination_risk > two.hallucination_risk);
    }

    #[test]
    fn test_competing_group_never_zero_risk() {
        for loser_confidence in [0.0, 0.1] {
            let set = ResponseSet::new(
                2,
                vec![
                    ResponderOutcome::ok("miner-1", TOKYO_1, 100.0, 5.0, 100),
                    ResponderOutcome::ok("miner-2", OTHER, loser_confidence, 5.0, 100),
                ],
                100,
            );
            let result = verdict(0.8, set);
            assert_eq!(result.groups.len(), 2);
            assert!(
                result.hallucination_risk >= 1,
                "risk 0 with a competing group at loser confidence {}",
                loser_confidence
            );
        }
    }

    #[test]
    fn test_single_group_has_zero_risk() {
        let set = ResponseSet::new(
            2,
            vec![
                ResponderOutcome::ok("miner-1", TOKYO_1, 90.0, 4.0, 100),
                ResponderOutcome::ok("miner-2", TOKYO_2, 90.0, 4.0, 100),
            ],
            100,
        );
        let result = verdict(0.8, set);
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.hallucination_risk, 0);
    }
}
