//! Infrastructure layer for consensus-oracle
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod registry;
pub mod responders;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileEngineConfig, FileOutputConfig,
    FileQueryConfig, FileResponderConfig,
};
pub use registry::InMemoryQueryRegistry;
pub use responders::{ResponderBehavior, SimulatedResponder, StaticResponderPool, canned_answer};
