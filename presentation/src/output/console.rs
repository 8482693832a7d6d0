//! Console output formatter for query records

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use oracle_domain::{
    AnalysisResult, OutcomeStatus, QueryRecord, QueryState, ResponderOutcome, VerificationStatus,
};

/// Formats query records for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete record
    pub fn format(record: &QueryRecord) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Consensus Oracle Results"));
        output.push('\n');

        output.push_str(&Self::query_block(record));

        match (&record.result, &record.failure) {
            (Some(result), _) => {
                output.push_str(&Self::consensus_section(result));
                output.push_str(&Self::responders_section(result));
                output.push_str(&Self::metrics_section(result));
            }
            (None, Some(failure)) => {
                output.push_str(&Self::section_header("Consensus"));
                output.push_str(&format!(
                    "\n{}  {}\n",
                    Self::state_badge(record.state),
                    failure
                ));
            }
            (None, None) => {
                output.push_str(&format!(
                    "\n{} {}\n",
                    "State:".cyan().bold(),
                    Self::state_badge(record.state)
                ));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(record: &QueryRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_summary(record: &QueryRecord) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Consensus Oracle Verdict ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), record.query.text()));

        match (&record.result, &record.failure) {
            (Some(result), _) => {
                output.push_str(&format!(
                    "{}  confidence {}%  risk {}%  {}\n\n",
                    Self::status_badge(result.status),
                    result.confidence_score,
                    result.hallucination_risk,
                    format!(
                        "({}/{} responders agreed)",
                        result.winner().map_or(0, |g| g.len()),
                        result.responses.solicited()
                    )
                    .dimmed()
                ));
                output.push_str(&result.consensus);
                output.push('\n');
            }
            (None, Some(failure)) => {
                output.push_str(&format!(
                    "{}  {}\n",
                    Self::state_badge(record.state),
                    failure
                ));
            }
            (None, None) => {
                output.push_str(&format!("{}\n", Self::state_badge(record.state)));
            }
        }

        output
    }

    fn query_block(record: &QueryRecord) -> String {
        let query = &record.query;
        let submitted = i64::try_from(query.submitted_at_ms())
            .ok()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {}\n{} {} ({})\n{} {} {}\n",
            "Query:".cyan().bold(),
            query.text(),
            "Kind:".cyan().bold(),
            query.options().kind,
            query.options().kind.description().dimmed(),
            "Id:".cyan().bold(),
            query.id().to_string().dimmed(),
            format!("submitted {}", submitted).dimmed()
        )
    }

    fn consensus_section(result: &AnalysisResult) -> String {
        let mut output = Self::section_header("Consensus");

        output.push_str(&format!(
            "\n{}  {}\n\n",
            Self::status_badge(result.status),
            format!("completed in {}", format_elapsed(result.elapsed_ms)).dimmed()
        ));
        output.push_str(&Self::indent(&result.consensus, "  "));
        output.push_str("\n\n");
        output.push_str(&format!(
            "  {} {}   {} {}\n",
            "Confidence:".bold(),
            Self::score(result.confidence_score, true),
            "Hallucination risk:".bold(),
            Self::score(result.hallucination_risk, false)
        ));

        output
    }

    fn responders_section(result: &AnalysisResult) -> String {
        let mut output = Self::section_header(&format!(
            "Responders ({} solicited)",
            result.responses.solicited()
        ));

        for outcome in result.responses.outcomes() {
            output.push_str(&Self::responder_entry(outcome));
        }

        output
    }

    fn responder_entry(outcome: &ResponderOutcome) -> String {
        let title = format!("── {} ──", outcome.responder);
        let title = match outcome.status {
            OutcomeStatus::Ok => title.yellow().bold(),
            OutcomeStatus::Timeout | OutcomeStatus::Error => title.red().bold(),
        };

        let confidence = outcome
            .confidence
            .map(|c| format!("{:.0}%", c))
            .unwrap_or_else(|| "-".to_string());
        let details = format!(
            "{}  confidence {}  reputation {:.1}  {}",
            Self::outcome_badge(outcome.status),
            confidence,
            outcome.reputation,
            format_elapsed(outcome.elapsed_ms)
        );

        let body = match outcome.status {
            OutcomeStatus::Ok => outcome.text.clone().unwrap_or_default(),
            OutcomeStatus::Timeout => "No answer before the deadline".to_string(),
            OutcomeStatus::Error => format!(
                "Error: {}",
                outcome.error.as_deref().unwrap_or("Unknown")
            ),
        };

        format!("\n{}\n{}\n{}\n", title, details, body)
    }

    fn metrics_section(result: &AnalysisResult) -> String {
        let mut output = Self::section_header("Metrics");

        output.push_str(&format!(
            "\n  {:<22} {:.2}\n  {:<22} {:.2}\n  {:<22} {}\n",
            "Agreement ratio (R):",
            result.agreement_ratio,
            "Participation (P):",
            result.participation_ratio,
            "Consensus groups:",
            result.groups.len()
        ));

        for (rank, group) in result.groups.iter().enumerate() {
            let label = if rank == 0 {
                "winner".green().bold()
            } else {
                format!("#{}", rank + 1).normal()
            };
            output.push_str(&format!(
                "    {} weight {:.1}  [{}]\n",
                label,
                group.weight,
                group.responders.join(", ")
            ));
        }

        output
    }

    fn status_badge(status: VerificationStatus) -> ColoredString {
        let label = format!("[{}]", status.as_str().to_uppercase());
        match status {
            VerificationStatus::Verified => label.green().bold(),
            VerificationStatus::Disputed => label.yellow().bold(),
            VerificationStatus::Failed => label.red().bold(),
        }
    }

    fn state_badge(state: QueryState) -> ColoredString {
        let label = format!("[{}]", state.as_str().to_uppercase());
        match state {
            QueryState::Completed => label.green().bold(),
            QueryState::Failed => label.red().bold(),
            QueryState::Pending | QueryState::Processing => label.yellow().bold(),
        }
    }

    fn outcome_badge(status: OutcomeStatus) -> ColoredString {
        match status {
            OutcomeStatus::Ok => "ok".green(),
            OutcomeStatus::Timeout => "timeout".red(),
            OutcomeStatus::Error => "error".red(),
        }
    }

    /// Color a 0-100 score; `high_is_good` picks the direction
    fn score(value: u8, high_is_good: bool) -> ColoredString {
        let text = format!("{}%", value);
        let goodness = if high_is_good { value } else { 100 - value.min(100) };
        match goodness {
            80..=100 => text.green().bold(),
            50..=79 => text.yellow().bold(),
            _ => text.red().bold(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, record: &QueryRecord) -> String {
        Self::format(record)
    }

    fn format_json(&self, record: &QueryRecord) -> String {
        Self::format_json(record)
    }

    fn format_summary(&self, record: &QueryRecord) -> String {
        Self::format_summary(record)
    }
}

/// `850ms`, `2.4s`
fn format_elapsed(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}
