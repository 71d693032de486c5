//! The contract between the relay and the client transport.
//!
//! The relay never talks to sockets directly; it depends on this narrow
//! interface, implemented by the WebSocket layer in production and by a
//! recording fake in tests.
use super::entry::RelayEvent;
use serde::Deserialize;

/// Opaque handle identifying one connected client.
pub type ClientId = u64;

/// Emission interface the relay pushes events through.
///
/// All methods are fire-and-forget: delivery to a client that has gone away
/// is silently dropped by the implementation, never surfaced to the relay.
pub trait Clients: Send + Sync {
    /// Sends an event to a single client.
    fn emit_to(&self, client: ClientId, event: &RelayEvent);

    /// Sends an event to every connected client.
    fn broadcast(&self, event: &RelayEvent);

    /// Sends an event to every connected client except one.
    fn broadcast_except(&self, client: ClientId, event: &RelayEvent);
}

/// Commands a connected client can send to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Wipe the history and tell the other clients to do the same.
    LogClear,
    /// Replay the full history to the requesting client.
    LogCatchup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_client_commands() {
        let clear: ClientCommand = serde_json::from_str(r#"{"type":"log_clear"}"#).unwrap();
        assert_eq!(clear, ClientCommand::LogClear);

        let catchup: ClientCommand = serde_json::from_str(r#"{"type":"log_catchup"}"#).unwrap();
        assert_eq!(catchup, ClientCommand::LogCatchup);
    }

    #[test]
    fn rejects_unknown_commands() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"type":"shutdown"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>("not json").is_err());
    }
}
