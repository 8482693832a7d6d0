//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`time`]: wall-clock helpers used for timestamps

pub mod error;
pub mod time;
