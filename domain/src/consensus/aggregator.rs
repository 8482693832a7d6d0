//! Consensus clustering
//!
//! Groups the usable answers of a [`ResponseSet`] by textual agreement and
//! orders the groups by weight, winner first.

use super::outcome::{ResponderOutcome, ResponseSet};
use super::similarity::{AgreementMeasure, TokenOverlap};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// A set of mutually agreeing ok-outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusGroup {
    /// Arrival indices of the members in the response set, ascending
    pub members: Vec<usize>,
    /// Responder identifiers of the members, same order as `members`
    pub responders: Vec<String>,
    /// Σ reputation × confidence of the members
    pub weight: f64,
    /// Text of the heaviest member (earliest arrival on ties)
    pub representative: String,
}

impl ConsensusGroup {
    fn from_members(set: &ResponseSet, members: Vec<usize>) -> Self {
        let outcomes: Vec<&ResponderOutcome> =
            members.iter().filter_map(|&i| set.get(i)).collect();

        let weight = outcomes.iter().map(|o| o.weight()).sum();

        let mut heaviest: Option<&ResponderOutcome> = None;
        for outcome in &outcomes {
            if heaviest.is_none_or(|h| outcome.weight() > h.weight()) {
                heaviest = Some(outcome);
            }
        }

        Self {
            responders: outcomes.iter().map(|o| o.responder.clone()).collect(),
            representative: heaviest
                .and_then(|o| o.text.clone())
                .unwrap_or_default(),
            members,
            weight,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Arrival index of the earliest member
    pub fn first_arrival(&self) -> usize {
        self.members.first().copied().unwrap_or(usize::MAX)
    }

    /// Heavier first, then larger, then earlier
    fn rank(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.len().cmp(&self.len()))
            .then_with(|| self.first_arrival().cmp(&other.first_arrival()))
    }
}

/// Clusters ok-outcomes into consensus groups
///
/// Single pass in arrival order: each answer joins the first existing group
/// whose every member it agrees with (agreement ≥ the similarity threshold),
/// otherwise it starts a new group.
///
/// # Example
///
/// ```
/// use oracle_domain::consensus::{ConsensusAggregator, ResponderOutcome, ResponseSet};
///
/// let set = ResponseSet::new(
///     3,
///     vec![
///         ResponderOutcome::ok("miner-1", "The square root of 144 is 12", 95.0, 4.5, 800),
///         ResponderOutcome::ok("miner-2", "Square root of 144 is 12", 90.0, 4.0, 900),
///         ResponderOutcome::ok("miner-3", "It is fourteen", 60.0, 2.0, 950),
///     ],
///     950,
/// );
///
/// let groups = ConsensusAggregator::new(0.6).cluster(&set);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].members, vec![0, 1]);
/// ```
#[derive(Clone)]
pub struct ConsensusAggregator {
    measure: Arc<dyn AgreementMeasure>,
    similarity_threshold: f64,
}

impl ConsensusAggregator {
    /// Aggregator using [`TokenOverlap`]
    pub fn new(similarity_threshold: f64) -> Self {
        Self::with_measure(Arc::new(TokenOverlap), similarity_threshold)
    }

    pub fn with_measure(measure: Arc<dyn AgreementMeasure>, similarity_threshold: f64) -> Self {
        Self {
            measure,
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    pub fn measure_name(&self) -> &'static str {
        self.measure.name()
    }

    /// Cluster the ok-outcomes of `set`, heaviest group first
    ///
    /// Returns an empty list when there are no ok-outcomes.
    pub fn cluster(&self, set: &ResponseSet) -> Vec<ConsensusGroup> {
        let mut clusters: Vec<Vec<(usize, &str)>> = Vec::new();

        for (index, outcome) in set.ok_outcomes() {
            let text = outcome.text.as_deref().unwrap_or_default();

            let home = clusters.iter_mut().find(|members| {
                members.iter().all(|(_, other)| {
                    self.measure.agreement(text, other) >= self.similarity_threshold
                })
            });

            match home {
                Some(members) => members.push((index, text)),
                None => clusters.push(vec![(index, text)]),
            }
        }

        let mut groups: Vec<ConsensusGroup> = clusters
            .into_iter()
            .map(|members| {
                ConsensusGroup::from_members(set, members.into_iter().map(|(i, _)| i).collect())
            })
            .collect();

        groups.sort_by(|a, b| a.rank(b));
        groups
    }
}

impl std::fmt::Debug for ConsensusAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsensusAggregator")
            .field("measure", &self.measure.name())
            .field("similarity_threshold", &self.similarity_threshold)
            .finish()
    }
}
