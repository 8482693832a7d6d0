//! Application-level configuration.
//!
//! - [`EngineConfig`]: consensus constants and default query options

pub mod engine_config;

pub use engine_config::EngineConfig;
