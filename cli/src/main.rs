//! CLI entrypoint for Consensus Oracle
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use oracle_application::{NoProgress, ProgressNotifier, QueryLifecycle};
use oracle_infrastructure::{ConfigLoader, FileConfig, InMemoryQueryRegistry, StaticResponderPool};
use oracle_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    info!("Starting Consensus Oracle");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    if let Err(e) = file_config.validate() {
        bail!("Invalid configuration: {}", e);
    }

    let output = OutputConfig::resolve(&cli, file_config.output.format, file_config.output.color);
    output.apply_color();

    let query = match cli.query.as_deref() {
        Some(q) => q,
        None => bail!("A query is required, e.g. consensus-oracle \"What is the population of Tokyo?\""),
    };

    // === Dependency Injection ===
    let lifecycle = build_lifecycle(&file_config, &output)?;

    let options = lifecycle.config().options_with(
        cli.kind,
        cli.responders,
        cli.threshold,
        cli.timeout_ms,
    );

    if output.show_progress {
        println!();
        println!("Query: {}", query);
        println!(
            "Kind: {} | responders: {} | threshold: {:.2} | timeout: {}ms",
            options.kind, options.responder_count, options.consensus_threshold, options.timeout_ms
        );
        println!();
    }

    let ticket = lifecycle
        .submit_query_tracked(query, options)
        .context("Query rejected")?;
    let id = ticket.id().clone();

    if ticket.wait().await.is_none() {
        warn!(query_id = %id, "Query processing task did not finish cleanly");
    }

    let Some(record) = lifecycle.get_query_result(&id) else {
        bail!("Query {} disappeared from the registry", id);
    };

    let formatter: &dyn OutputFormatter = &ConsoleFormatter;
    println!("{}", formatter.render(output.format, &record));

    Ok(())
}

fn build_lifecycle(file_config: &FileConfig, output: &OutputConfig) -> Result<QueryLifecycle> {
    let engine_config = file_config.to_engine_config()?;
    let pool = StaticResponderPool::from_config(&file_config.responders)?;
    info!(responders = ?pool.ids(), "Responder pool ready");

    let progress: Arc<dyn ProgressNotifier> = if !output.show_progress {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let lifecycle = QueryLifecycle::new(
        engine_config,
        Arc::new(InMemoryQueryRegistry::new()),
        Arc::new(pool),
    )?
    .with_progress(progress);

    Ok(lifecycle)
}

/// Initialize logging based on verbosity level; `RUST_LOG` overrides it
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let Some(file_name) = path.file_name() else {
                bail!("--log-file must name a file: {}", path.display());
            };

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();

            Ok(None)
        }
    }
}
