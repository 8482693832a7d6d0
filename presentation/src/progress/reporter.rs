//! Progress reporting while responders are asked

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use oracle_application::ProgressNotifier;
use oracle_domain::{AnalysisResult, OutcomeStatus, QueryId, ResponseSet};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one progress bar per query
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<QueryId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, query_id: &QueryId, f: impl FnOnce(&ProgressBar)) {
        let bars = self.bars.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(pb) = bars.get(query_id) {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_collection_start(&self, query_id: &QueryId, responders: usize) {
        let pb = self.multi.add(ProgressBar::new(responders as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix("Asking responders");
        pb.set_message("Waiting for answers...");

        self.bars
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(query_id.clone(), pb);
    }

    fn on_responder_complete(&self, query_id: &QueryId, responder: &str, status: OutcomeStatus) {
        self.with_bar(query_id, |pb| {
            let message = match status {
                OutcomeStatus::Ok => format!("{} {}", "v".green(), responder),
                OutcomeStatus::Timeout => format!("{} {} (timeout)", "x".red(), responder),
                OutcomeStatus::Error => format!("{} {} (error)", "x".red(), responder),
            };
            pb.set_message(message);
            pb.inc(1);
        });
    }

    fn on_collection_complete(&self, query_id: &QueryId, responses: &ResponseSet) {
        self.with_bar(query_id, |pb| {
            pb.set_message(format!(
                "{}/{} answered, scoring...",
                responses.ok_count(),
                responses.solicited()
            ));
        });
    }

    fn on_verdict(&self, query_id: &QueryId, result: &AnalysisResult) {
        let removed = self
            .bars
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(query_id);
        if let Some(pb) = removed {
            pb.finish_with_message(format!("{} {}", "Verdict:".green(), result.status));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_collection_start(&self, _query_id: &QueryId, responders: usize) {
        eprintln!(
            "{} {} ({} responders)",
            "->".cyan(),
            "Asking responders".bold(),
            responders
        );
    }

    fn on_responder_complete(&self, _query_id: &QueryId, responder: &str, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Ok => eprintln!("  {} {}", "v".green(), responder),
            other => eprintln!("  {} {} ({})", "x".red(), responder, other),
        }
    }

    fn on_collection_complete(&self, _query_id: &QueryId, responses: &ResponseSet) {
        eprintln!(
            "{} {}/{} answered",
            "->".cyan(),
            responses.ok_count(),
            responses.solicited()
        );
    }
}
