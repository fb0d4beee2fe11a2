use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docket_app::agenda::{self, AgendaReport};
use docket_app::input::{expansion_options, load_events, parse_instant};
use docket_core::config::load_config;
use docket_recur::{RecurrenceExpander, TimeWindow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Expand recurring calendar events into dated instances")]
struct Cli {
    /// IANA timezone whose wall clock series follow (overrides config)
    #[arg(long, global = true)]
    timezone: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every instance overlapping a time window
    Expand {
        /// JSON file holding an array of stored events
        #[arg(short, long)]
        input: PathBuf,

        /// Window start (e.g., "2024-01-01" or "2024-01-01T00:00:00Z")
        #[arg(long)]
        from: String,

        /// Window end, exclusive
        #[arg(long)]
        to: String,

        /// Prefix for generated instance ids
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Print the first occurrences of each recurring event
    Upcoming {
        /// JSON file holding an array of stored events
        #[arg(short, long)]
        input: PathBuf,

        /// Occurrences per event
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let expander = RecurrenceExpander::new(expansion_options(&config, cli.timezone.as_deref())?);

    let report = match cli.command {
        Commands::Expand {
            input,
            from,
            to,
            prefix,
        } => {
            let window = TimeWindow::new(parse_instant(&from)?, parse_instant(&to)?);
            agenda::collect_window(&expander, load_events(&input)?, window, prefix.as_deref())
        }
        Commands::Upcoming { input, limit } => {
            agenda::collect_upcoming(&expander, load_events(&input)?, limit)
        }
    };

    print_report(&report)
}

fn print_report(report: &AgendaReport) -> Result<()> {
    if !report.notices.is_empty() {
        tracing::info!(notices = report.notices.len(), "Some events were skipped or cut short");
    }

    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
