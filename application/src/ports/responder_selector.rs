//! Responder selection port

use super::responder_client::ResponderHandle;
use oracle_domain::QueryKind;

/// Chooses which responders a query is sent to
///
/// Discovery and reputation bookkeeping are the implementation's concern;
/// the engine only consumes the handles it returns. Returning fewer than
/// `count` handles is allowed (the query is then asked of fewer responders).
pub trait ResponderSelector: Send + Sync {
    fn select(&self, kind: QueryKind, count: usize) -> Vec<ResponderHandle>;
}
