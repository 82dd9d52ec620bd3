//! boefjes-bytes - command-line client for the Bytes artifact store
//!
//! Loads the client configuration, builds the selected store and runs one
//! command. Queue events emitted by the store are printed after the
//! command's own output.

use std::sync::Arc;

use boefjes_application::Notifier;
use boefjes_infrastructure::{BytesClientConfig, InMemoryEventSink, SystemClock, build_store};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = BytesClientConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }

    let events = InMemoryEventSink::new();
    let notifier = Notifier::new(Arc::new(events.clone()), Arc::new(SystemClock));
    let store = build_store(&config, notifier)?;

    let mut stdout = std::io::stdout().lock();
    commands::execute(cli.command, store.as_ref(), &events, &mut stdout).await
}
