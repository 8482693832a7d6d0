//! Presentation-level configuration
//!
//! Resolves how results are shown from the command line and the `[output]`
//! section of the configuration file. Command-line flags win.

use crate::cli::commands::{Cli, OutputFormat};

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators while responders are asked
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Combine CLI flags with the file's `[output]` settings
    pub fn resolve(
        cli: &Cli,
        file_format: Option<oracle_domain::OutputFormat>,
        file_color: bool,
    ) -> Self {
        let format = cli
            .output
            .or(file_format.map(OutputFormat::from))
            .unwrap_or(OutputFormat::Summary);

        Self {
            format,
            color: file_color,
            // Progress bars would interleave with JSON on the terminal
            show_progress: !cli.quiet && format != OutputFormat::Json,
        }
    }

    /// Apply the color setting process-wide
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
