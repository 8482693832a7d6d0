//! Static responder pool
//!
//! A fixed list of responders, handed out round-robin so that repeated
//! queries do not always hit the same subset.

use super::simulated::SimulatedResponder;
use crate::config::{ConfigValidationError, FileResponderConfig};
use oracle_application::{ResponderHandle, ResponderSelector};
use oracle_domain::QueryKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// [`ResponderSelector`] over a fixed set of handles
#[derive(Debug)]
pub struct StaticResponderPool {
    handles: Vec<ResponderHandle>,
    next: AtomicUsize,
}

impl StaticResponderPool {
    pub fn new(handles: Vec<ResponderHandle>) -> Self {
        Self {
            handles,
            next: AtomicUsize::new(0),
        }
    }

    /// Three agreeing simulated responders
    pub fn default_pool() -> Self {
        let specs = [
            ("miner-1", 4.8, 96.0, 400),
            ("miner-2", 4.6, 92.0, 600),
            ("miner-3", 4.9, 95.0, 800),
        ];
        let handles = specs
            .into_iter()
            .map(|(id, reputation, confidence, latency_ms)| {
                let responder = SimulatedResponder::new(id)
                    .with_confidence(confidence)
                    .with_latency(Duration::from_millis(latency_ms));
                ResponderHandle::new(Arc::new(responder), reputation)
            })
            .collect();
        Self::new(handles)
    }

    /// Build a pool from `[[responders]]` entries, or the default pool if
    /// there are none
    pub fn from_config(
        responders: &[FileResponderConfig],
    ) -> Result<Self, ConfigValidationError> {
        if responders.is_empty() {
            debug!("No responders configured, using default pool");
            return Ok(Self::default_pool());
        }

        let handles = responders
            .iter()
            .map(|config| {
                let responder = SimulatedResponder::new(config.id.clone())
                    .with_confidence(config.confidence)
                    .with_latency(Duration::from_millis(config.latency_ms))
                    .with_behavior(config.parse_behavior()?);
                Ok(ResponderHandle::new(Arc::new(responder), config.reputation))
            })
            .collect::<Result<Vec<_>, ConfigValidationError>>()?;

        Ok(Self::new(handles))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.handles.iter().map(|h| h.id()).collect()
    }
}

impl ResponderSelector for StaticResponderPool {
    fn select(&self, kind: QueryKind, count: usize) -> Vec<ResponderHandle> {
        if self.handles.is_empty() || count == 0 {
            return Vec::new();
        }

        let take = count.min(self.handles.len());
        if take < count {
            info!(
                requested = count,
                available = self.handles.len(),
                "Responder pool smaller than requested count"
            );
        }

        let start = self.next.fetch_add(1, Ordering::Relaxed) % self.handles.len();
        let selected: Vec<ResponderHandle> = self
            .handles
            .iter()
            .cycle()
            .skip(start)
            .take(take)
            .cloned()
            .collect();

        debug!(
            %kind,
            responders = ?selected.iter().map(|h| h.id()).collect::<Vec<_>>(),
            "Selected responders"
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(n: usize) -> StaticResponderPool {
        StaticResponderPool::new(
            (0..n)
                .map(|i| {
                    ResponderHandle::new(
                        Arc::new(SimulatedResponder::new(format!("miner-{}", i + 1))),
                        4.0,
                    )
                })
                .collect(),
        )
    }

    fn ids(handles: &[ResponderHandle]) -> Vec<&str> {
        handles.iter().map(|h| h.id()).collect()
    }

    #[test]
    fn test_default_pool() {
        let pool = StaticResponderPool::default_pool();
        assert_eq!(pool.ids(), vec!["miner-1", "miner-2", "miner-3"]);
    }

    #[test]
    fn test_select_rotates_start() {
        let pool = pool_of(3);
        let first = pool.select(QueryKind::Fact, 2);
        let second = pool.select(QueryKind::Fact, 2);
        let third = pool.select(QueryKind::Fact, 2);

        assert_eq!(ids(&first), vec!["miner-1", "miner-2"]);
        assert_eq!(ids(&second), vec!["miner-2", "miner-3"]);
        assert_eq!(ids(&third), vec!["miner-3", "miner-1"]);
    }

    #[test]
    fn test_select_caps_at_pool_size() {
        let pool = pool_of(2);
        let selected = pool.select(QueryKind::Opinion, 5);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let pool = StaticResponderPool::new(Vec::new());
        assert!(pool.select(QueryKind::Fact, 3).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config: crate::config::FileConfig = toml::from_str(
            r#"
[[responders]]
id = "alpha"
reputation = 3.5
behavior = "fixed"
answer = "42"

[[responders]]
id = "beta"
behavior = "hang"
"#,
        )
        .unwrap();

        let pool = StaticResponderPool::from_config(&config.responders).unwrap();
        assert_eq!(pool.ids(), vec!["alpha", "beta"]);

        let selected = pool.select(QueryKind::Calculation, 2);
        assert_eq!(selected[0].reputation(), 3.5);
        assert_eq!(selected[1].reputation(), 4.0);
    }

    #[test]
    fn test_from_empty_config_uses_default_pool() {
        let pool = StaticResponderPool::from_config(&[]).unwrap();
        assert_eq!(pool.len(), 3);
    }
}
