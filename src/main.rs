use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use kalshi_dash::config::Config;
use kalshi_dash::services::{self, fetch_view, GeneratorOptions};
use kalshi_dash::sources::SummarySource;
use kalshi_dash::tui::{self, LogBuffer, LogMakeWriter};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Portfolio summary dashboard for Kalshi trading activity.
#[derive(Debug, Parser)]
#[command(name = "kalshi-dash", version, about)]
struct Cli {
    /// Read the summary from a local file instead of over HTTP.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Full summary URL; replaces DASHBOARD_BASE_URL and SUMMARY_PATH.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Polling interval in seconds (clamped to 5..=60).
    #[arg(long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the summary in the terminal dashboard (default).
    Watch,
    /// Fetch the summary once and print it.
    Once {
        /// Print the normalized view as JSON.
        #[arg(long)]
        json: bool,
        /// Rows per table in the text report.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Build the summary document from a raw account export.
    Generate {
        /// Raw export with balance, positions, fills and settlements.
        #[arg(long)]
        input: PathBuf,
        /// Output path; defaults to SUMMARY_OUTPUT.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Lookback window in days.
        #[arg(long)]
        days: Option<u32>,
        /// Total deposited capital in dollars.
        #[arg(long)]
        deposits: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(file) = cli.file {
        config.summary_file = Some(file);
    }
    if let Some(url) = cli.url {
        config.base_url = url;
        config.summary_path = String::new();
    }
    if let Some(secs) = cli.interval {
        config.poll_interval_secs = kalshi_dash::config::clamp_poll_interval(secs);
    }

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            // The dashboard owns the terminal, so logs go to the Logs view.
            let buffer = Arc::new(LogBuffer::new(config.log_buffer_lines));
            init_tracing(Some(buffer.clone()));

            let source = SummarySource::from_config(&config)?;
            info!("Starting dashboard for {}", source.describe());
            tui::run_tui(&config, source, buffer).await?;
        }
        Command::Once { json, limit } => {
            init_tracing(None);

            let source = SummarySource::from_config(&config)?;
            let view = fetch_view(&source, config.cash_unit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", services::report::render(&view, limit));
            }
        }
        Command::Generate {
            input,
            output,
            days,
            deposits,
        } => {
            init_tracing(None);

            let text = tokio::fs::read_to_string(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;
            let raw: Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", input.display()))?;

            let options = GeneratorOptions {
                lookback_days: days.unwrap_or(config.lookback_days),
                total_deposits: deposits.unwrap_or(config.total_deposits),
                cash_unit: config.cash_unit,
                now: Utc::now(),
            };
            let summary = services::generate(&raw, &options);
            let path = output.unwrap_or(config.output_path);
            services::write_summary(&path, &summary)?;
        }
    }

    Ok(())
}

/// Install the global subscriber, writing into `buffer` when given and to
/// stderr otherwise.
fn init_tracing(buffer: Option<Arc<LogBuffer>>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "kalshi_dash=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match buffer {
        Some(buffer) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(LogMakeWriter::new(buffer)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
