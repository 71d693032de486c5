//! The main entry point for the UI log relay.
mod app;
mod relay;
mod web;

use anyhow::Result;

/// Launches the relay: parses command-line arguments, wires the log
/// collector and client registry together, and serves the WebSocket
/// endpoint until the process is stopped.
///
/// # Errors
///
/// Returns an error if setup fails or the server cannot bind its port.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
