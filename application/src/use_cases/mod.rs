//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collect_responses;
pub mod query_lifecycle;
