//! Responder adapters
//!
//! - [`SimulatedResponder`]: deterministic [`ResponderClient`](oracle_application::ResponderClient)
//! - [`StaticResponderPool`]: round-robin [`ResponderSelector`](oracle_application::ResponderSelector)

mod catalog;
mod pool;
mod simulated;

pub use catalog::canned_answer;
pub use pool::StaticResponderPool;
pub use simulated::{ResponderBehavior, SimulatedResponder};
