//! Domain layer for consensus-oracle
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Query
//!
//! A natural-language question asked of K independent responders under a
//! deadline. Its lifecycle is `pending → processing → completed | failed`.
//!
//! ## Consensus
//!
//! The answers that arrive are clustered by textual agreement, weighted by
//! responder reputation × self-reported confidence, and scored into a
//! verdict with a confidence score and a hallucination-risk score.

pub mod config;
pub mod consensus;
pub mod core;
pub mod query;

// Re-export commonly used types
pub use config::OutputFormat;
pub use consensus::{
    AgreementMeasure, AnalysisResult, ConsensusAggregator, ConsensusGroup, ConsensusParams,
    OutcomeStatus, ResponderOutcome, ResponseSet, TokenOverlap, VerdictBuilder,
    VerificationStatus,
};
pub use core::{error::DomainError, time::current_timestamp_ms};
pub use query::{
    Query, QueryFailure, QueryId, QueryKind, QueryOptions, QueryRecord, QueryState, QueryText,
    QueryTransition,
};
