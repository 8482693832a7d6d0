//! Consensus domain
//!
//! This module contains the pure, synchronous half of the oracle: turning a
//! frozen set of responder outcomes into a verdict.
//!
//! # Pipeline
//!
//! ```text
//! ResponseSet ──► ConsensusAggregator::cluster ──► Vec<ConsensusGroup>
//!      │                                                   │
//!      └──────────────► VerdictBuilder::build ◄────────────┘
//!                              │
//!                              ▼
//!                       AnalysisResult
//! ```
//!
//! Only `ok` outcomes take part in clustering; timeouts and errors still
//! count against the participation ratio.

pub mod aggregator;
pub mod outcome;
pub mod params;
pub mod similarity;
pub mod verdict;

// Re-export main types
pub use aggregator::{ConsensusAggregator, ConsensusGroup};
pub use outcome::{OutcomeStatus, ResponderOutcome, ResponseSet};
pub use params::ConsensusParams;
pub use similarity::{AgreementMeasure, TokenOverlap, normalized_tokens};
pub use verdict::{AnalysisResult, VerdictBuilder, VerificationStatus};
