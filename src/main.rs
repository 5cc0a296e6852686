use checkout_flow::application::session::{CheckoutSession, SessionSnapshot};
use checkout_flow::config::CheckoutConfig;
use checkout_flow::infrastructure::in_memory::{Navigation, RecordingRouter};
use checkout_flow::interfaces::csv::event_reader::EventReader;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scripted UI events CSV file (`event,value`)
    script: PathBuf,

    /// JSON configuration (delays, rates, countries). Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    state: SessionSnapshot,
    navigations: Vec<Navigation>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => CheckoutConfig::from_path(path).into_diagnostic()?,
        None => CheckoutConfig::default(),
    };

    let router = RecordingRouter::new();
    let mut session = CheckoutSession::new(config, Arc::new(router.clone()));

    // Replay the script
    let file = File::open(&cli.script).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = session.apply(&event).await {
                    tracing::warn!("Event rejected ({:?}): {}", event.event, e);
                }
            }
            Err(e) => {
                tracing::error!("Error reading event: {}", e);
            }
        }
    }

    // Let every simulated operation finish before reporting
    tracing::debug!(pending = session.pending_count(), "settling");
    session.settle().await.into_diagnostic()?;

    let report = Report {
        state: session.snapshot().await,
        navigations: router.navigations().await,
    };
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report).into_diagnostic()?;
    println!();

    Ok(())
}
