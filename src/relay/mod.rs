//! This module contains the in-memory log relay.
//!
//! The `LogBuffer` keeps a bounded history of recent log entries, rebroadcasts
//! every new entry to all connected UI clients, and replays the full history
//! to individual clients on request.
pub mod collector;
pub mod entry;
pub mod transport;

pub use collector::RelayLogCollector;
pub use entry::{LogEntry, LogLevel, RelayEvent};
pub use transport::{ClientCommand, ClientId, Clients};

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Maximum number of entries retained for replay. Oldest evicted first.
pub const HISTORY_CAPACITY: usize = 500;

/// Bounded buffer of recent log entries, relayed live to connected clients.
pub struct LogBuffer {
    /// Recent entries in insertion order. The lock is held across the whole
    /// of add, clear, and catchup, so the three serialize against each other
    /// when called from concurrent tasks.
    history: Mutex<VecDeque<LogEntry>>,
    /// Maximum history length.
    capacity: usize,
    /// The client transport events are pushed through.
    clients: Arc<dyn Clients>,
}

impl LogBuffer {
    /// Creates a relay with the production history capacity.
    ///
    /// The history starts with a single synthetic "Application started" entry
    /// so a catching-up client always sees when the process came up.
    pub fn new(clients: Arc<dyn Clients>) -> Self {
        Self::with_capacity(clients, HISTORY_CAPACITY)
    }

    /// Creates a relay with an explicit capacity. Used by tests.
    pub fn with_capacity(clients: Arc<dyn Clients>, capacity: usize) -> Self {
        let mut history = VecDeque::with_capacity(capacity);
        history.push_back(LogEntry {
            timestamp: now_millis(),
            source: "log".to_string(),
            level: LogLevel::Info,
            message: "Application started".to_string(),
        });
        Self {
            history: Mutex::new(history),
            capacity,
            clients,
        }
    }

    /// Records a log event and broadcasts it to all connected clients.
    ///
    /// An empty or unrecognized `level` marks a malformed event; the call is
    /// silently ignored. Source and message are accepted as-is.
    pub fn add(&self, source: &str, level: &str, message: &str) {
        if let Some(level) = LogLevel::parse(level) {
            self.add_entry(source, level, message);
        }
    }

    /// Typed variant of [`add`](Self::add) for in-process callers.
    pub fn add_entry(&self, source: &str, level: LogLevel, message: &str) {
        let mut history = self.history.lock().unwrap();
        self.record(&mut history, source, level, message);
    }

    /// Broadcasts and appends one entry. Caller holds the history lock, so
    /// the broadcast and the append are one atomic step relative to clear
    /// and catchup; emissions are synchronous channel pushes and never
    /// block under the lock.
    fn record(
        &self,
        history: &mut VecDeque<LogEntry>,
        source: &str,
        level: LogLevel,
        message: &str,
    ) {
        let entry = LogEntry {
            timestamp: now_millis(),
            source: source.to_string(),
            level,
            message: message.to_string(),
        };

        self.clients.broadcast(&RelayEvent::from_entry(&entry));

        history.push_back(entry);
        while history.len() > self.capacity {
            history.pop_front();
        }
    }

    /// Dispatches a command received from one connected client.
    ///
    /// The WebSocket layer registers this for every client it accepts.
    pub fn handle_command(&self, client: ClientId, command: ClientCommand) {
        match command {
            ClientCommand::LogClear => self.clear(client),
            ClientCommand::LogCatchup => self.catchup(client),
        }
    }

    /// Wipes the history on behalf of `requester`.
    ///
    /// Every other client is told to clear its view; the requester already
    /// cleared its own. A synthetic "Log cleared" entry then goes through the
    /// normal broadcast-and-append path and becomes the sole history entry.
    /// The history lock is held across all three steps so no concurrent add
    /// can land between the reset and the synthetic entry.
    fn clear(&self, requester: ClientId) {
        let mut history = self.history.lock().unwrap();

        self.clients
            .broadcast_except(requester, &RelayEvent::LogClear);

        history.clear();

        self.record(&mut history, "log", LogLevel::Info, "Log cleared");
    }

    /// Replays the full history, in order, to the requesting client only.
    ///
    /// No completion marker follows the last entry; the client infers the end
    /// of the replay from the absence of further events.
    fn catchup(&self, client: ClientId) {
        let history = self.history.lock().unwrap();
        for entry in history.iter() {
            self.clients.emit_to(client, &RelayEvent::from_entry(entry));
        }
    }

    /// Current number of buffered entries.
    pub fn history_len(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    /// Copies the current history out, in insertion order.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.history.lock().unwrap().iter().cloned().collect()
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
