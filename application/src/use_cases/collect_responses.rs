//! Collect Responses use case
//!
//! Fans a query out to its responders and gathers whatever arrives before
//! the deadline.

use crate::ports::progress::ProgressNotifier;
use crate::ports::responder_client::{ResponderAnswer, ResponderError, ResponderHandle};
use oracle_domain::{Query, ResponderOutcome, ResponseSet};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent collection from starting
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Races every responder call against the query deadline
///
/// All calls start concurrently. A call resolving before the deadline
/// contributes an `ok` or `error` outcome; a call still outstanding at the
/// deadline contributes a `timeout` outcome, and its task is cancelled so a
/// late answer can never reach the frozen [`ResponseSet`]. `collect` returns
/// as soon as every call has resolved or the deadline has passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCollector;

impl ResponseCollector {
    pub fn new() -> Self {
        Self
    }

    pub async fn collect(
        &self,
        query: &Query,
        responders: &[ResponderHandle],
        progress: &dyn ProgressNotifier,
    ) -> Result<ResponseSet, CollectError> {
        if responders.is_empty() {
            return Err(CollectError::InvalidConfiguration(
                "at least one responder is required".to_string(),
            ));
        }

        let deadline = query.options().timeout();
        let started = Instant::now();
        let cancel = CancellationToken::new();

        info!(
            query_id = %query.id(),
            responders = responders.len(),
            timeout_ms = query.options().timeout_ms,
            "Dispatching query"
        );

        let mut join_set = JoinSet::new();

        for (slot, handle) in responders.iter().enumerate() {
            let client = handle.client();
            let text = query.text().as_str().to_string();
            let kind = query.options().kind;
            let token = cancel.clone();

            join_set.spawn(async move {
                let call = tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    result = client.ask(&text, kind) => Some(result),
                };
                (slot, call, started.elapsed())
            });
        }

        let mut outcomes = Vec::with_capacity(responders.len());
        let mut resolved = vec![false; responders.len()];
        let mut expired = false;

        let expiry = tokio::time::sleep_until(started + deadline);
        tokio::pin!(expiry);

        loop {
            tokio::select! {
                biased;
                _ = &mut expiry => {
                    expired = true;
                    break;
                }
                joined = join_set.join_next() => {
                    let Some(joined) = joined else {
                        break;
                    };

                    match joined {
                        Ok((slot, Some(call), elapsed)) => {
                            let outcome = Self::to_outcome(&responders[slot], call, elapsed);
                            resolved[slot] = true;
                            progress.on_responder_complete(
                                query.id(),
                                &outcome.responder,
                                outcome.status,
                            );
                            outcomes.push(outcome);
                        }
                        Ok((_, None, _)) => {}
                        Err(e) => {
                            warn!(query_id = %query.id(), "Responder task join error: {}", e);
                        }
                    }
                }
            }
        }

        cancel.cancel();
        join_set.abort_all();

        let cutoff = started.elapsed().min(deadline);
        for (slot, handle) in responders.iter().enumerate() {
            if resolved[slot] {
                continue;
            }

            let outcome = if expired {
                warn!(
                    query_id = %query.id(),
                    responder = handle.id(),
                    "Responder timed out"
                );
                ResponderOutcome::timeout(handle.id(), handle.reputation(), millis(cutoff))
            } else {
                ResponderOutcome::error(
                    handle.id(),
                    "responder task ended without a result",
                    handle.reputation(),
                    millis(cutoff),
                )
            };
            progress.on_responder_complete(query.id(), &outcome.responder, outcome.status);
            outcomes.push(outcome);
        }

        let response_set = ResponseSet::new(responders.len(), outcomes, millis(cutoff));

        info!(
            query_id = %query.id(),
            ok = response_set.ok_count(),
            timeout = response_set.timeout_count(),
            error = response_set.error_count(),
            wall_time_ms = response_set.wall_time_ms(),
            "Collection finished"
        );

        Ok(response_set)
    }

    fn to_outcome(
        handle: &ResponderHandle,
        call: Result<ResponderAnswer, ResponderError>,
        elapsed: Duration,
    ) -> ResponderOutcome {
        match call {
            Ok(answer) if answer.text.trim().is_empty() => {
                warn!(responder = handle.id(), "Responder returned an empty answer");
                ResponderOutcome::error(
                    handle.id(),
                    "empty answer",
                    handle.reputation(),
                    millis(elapsed),
                )
            }
            Ok(answer) => {
                debug!(
                    responder = handle.id(),
                    confidence = answer.self_confidence,
                    elapsed_ms = millis(elapsed),
                    "Responder answered"
                );
                ResponderOutcome::ok(
                    handle.id(),
                    answer.text,
                    answer.self_confidence,
                    handle.reputation(),
                    millis(elapsed),
                )
            }
            Err(e) => {
                warn!(responder = handle.id(), "Responder failed: {}", e);
                ResponderOutcome::error(
                    handle.id(),
                    e.to_string(),
                    handle.reputation(),
                    millis(elapsed),
                )
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
