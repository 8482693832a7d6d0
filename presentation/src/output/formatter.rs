//! Output formatter trait

use crate::cli::commands::OutputFormat;
use oracle_domain::QueryRecord;

/// Trait for formatting query records
pub trait OutputFormatter {
    /// Format the complete record: consensus, responders and metrics
    fn format(&self, record: &QueryRecord) -> String;

    /// Format as JSON
    fn format_json(&self, record: &QueryRecord) -> String;

    /// Format the verdict and consensus answer only (concise output)
    fn format_summary(&self, record: &QueryRecord) -> String;

    /// Render in the chosen output format
    fn render(&self, format: OutputFormat, record: &QueryRecord) -> String {
        match format {
            OutputFormat::Full => self.format(record),
            OutputFormat::Summary => self.format_summary(record),
            OutputFormat::Json => self.format_json(record),
        }
    }
}
