//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod progress;
pub mod query_registry;
pub mod responder_client;
pub mod responder_selector;
