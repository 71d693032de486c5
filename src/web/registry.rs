//! Tracks connected WebSocket clients and implements the relay's
//! emission contract over their outbound queues.
use crate::relay::{ClientId, Clients, RelayEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Connected clients, keyed by id, each with an unbounded outbound queue.
///
/// Events are serialized once per call and pushed as JSON text frames. A
/// send to a client whose connection is gone is silently dropped; the
/// socket task unregisters the client when it notices.
#[derive(Default)]
pub struct ClientRegistry {
    next_id: AtomicU64,
    clients: Mutex<HashMap<ClientId, mpsc::UnboundedSender<String>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a new client, returning its id and the receiving end of its
    /// outbound queue.
    pub fn register(&self) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.lock().unwrap().insert(id, tx);
        (id, rx)
    }

    /// Removes a client after its connection closes.
    pub fn unregister(&self, client: ClientId) {
        self.clients.lock().unwrap().remove(&client);
    }

    /// Number of currently connected clients.
    pub fn len(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.lock().unwrap().is_empty()
    }
}

// No tracing calls in the emission paths: the relay collector turns every
// tracing event into an emission, so logging here would recurse.
impl Clients for ClientRegistry {
    fn emit_to(&self, client: ClientId, event: &RelayEvent) {
        let Ok(json) = serde_json::to_string(event) else {
            return;
        };
        if let Some(tx) = self.clients.lock().unwrap().get(&client) {
            let _ = tx.send(json);
        }
    }

    fn broadcast(&self, event: &RelayEvent) {
        let Ok(json) = serde_json::to_string(event) else {
            return;
        };
        for tx in self.clients.lock().unwrap().values() {
            let _ = tx.send(json.clone());
        }
    }

    fn broadcast_except(&self, client: ClientId, event: &RelayEvent) {
        let Ok(json) = serde_json::to_string(event) else {
            return;
        };
        for (id, tx) in self.clients.lock().unwrap().iter() {
            if *id != client {
                let _ = tx.send(json.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::LogLevel;

    fn log_event(message: &str) -> RelayEvent {
        RelayEvent::Log {
            timestamp: 1,
            source: "core".to_string(),
            level: LogLevel::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn broadcast_reaches_every_client() {
        let registry = ClientRegistry::new();
        let (_, mut rx_a) = registry.register();
        let (_, mut rx_b) = registry.register();

        registry.broadcast(&log_event("hello"));

        assert!(rx_a.try_recv().unwrap().contains("hello"));
        assert!(rx_b.try_recv().unwrap().contains("hello"));
    }

    #[test]
    fn broadcast_except_skips_the_named_client() {
        let registry = ClientRegistry::new();
        let (id_a, mut rx_a) = registry.register();
        let (_, mut rx_b) = registry.register();

        registry.broadcast_except(id_a, &RelayEvent::LogClear);

        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), r#"{"type":"log_clear"}"#);
    }

    #[test]
    fn emit_to_is_unicast() {
        let registry = ClientRegistry::new();
        let (id_a, mut rx_a) = registry.register();
        let (_, mut rx_b) = registry.register();

        registry.emit_to(id_a, &log_event("just you"));

        assert!(rx_a.try_recv().unwrap().contains("just you"));
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn emitting_to_a_gone_client_is_a_no_op() {
        let registry = ClientRegistry::new();
        let (id, rx) = registry.register();
        drop(rx);
        registry.unregister(id);

        registry.emit_to(id, &log_event("nobody home"));
        registry.broadcast(&log_event("nobody home"));
        assert!(registry.is_empty());
    }
}
