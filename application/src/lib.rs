//! Application layer for consensus-oracle
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineConfig;
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    query_registry::{QueryRegistry, RegistryError},
    responder_client::{ResponderAnswer, ResponderClient, ResponderError, ResponderHandle},
    responder_selector::ResponderSelector,
};
pub use use_cases::collect_responses::{CollectError, ResponseCollector};
pub use use_cases::query_lifecycle::{QueryLifecycle, QueryTicket, SubmitQueryError};
