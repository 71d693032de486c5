//! This module handles the initial setup of the application.
use super::args::AppArgs;
use crate::relay::{LogBuffer, RelayLogCollector};
use crate::web::ClientRegistry;
use anyhow::Result;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

/// Contains all the necessary components for the application to run.
pub struct PreparedApp {
    /// The port the WebSocket server listens on.
    pub port: u16,
    /// The log relay.
    pub relay: Arc<LogBuffer>,
    /// The connected-client registry the relay broadcasts through.
    pub registry: Arc<ClientRegistry>,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Finds a free port if none was specified.
/// 2. Builds the client registry and the relay on top of it.
/// 3. Installs the tracing subscriber, wiring the application's own log
///    stream into the relay.
/// 4. Prints a start banner.
///
/// # Errors
///
/// Returns an error if no free port can be found or a global tracing
/// subscriber is already installed.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    let port = match args.port {
        Some(port) => port,
        None => find_free_port()?,
    };

    let registry = Arc::new(ClientRegistry::new());
    let relay = Arc::new(LogBuffer::new(registry.clone()));

    configure_logging(&args.log_level, relay.clone())?;
    print_start_banner(port);

    Ok(PreparedApp {
        port,
        relay,
        registry,
    })
}

/// Configures logging for the application.
///
/// Stderr gets a filtered fmt layer; the relay collector sees every event
/// so connected clients receive the unfiltered stream.
fn configure_logging(directive: &str, relay: Arc<LogBuffer>) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(directive));

    let subscriber = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(RelayLogCollector::new(relay));

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Prints a banner with startup information.
fn print_start_banner(port: u16) {
    println!("🚀 Starting UI log relay");
    println!("WebSocket endpoint: ws://127.0.0.1:{}/ws", port);
    println!();
}

/// Finds a free TCP port on the local machine.
fn find_free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
