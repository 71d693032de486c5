//! A `tracing` layer that feeds the application's own log events into the
//! relay, making the process log stream the relay's log-event source.
use super::{LogBuffer, LogLevel};
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// Forwards every tracing event to a [`LogBuffer`].
pub struct RelayLogCollector {
    relay: Arc<LogBuffer>,
}

impl RelayLogCollector {
    pub fn new(relay: Arc<LogBuffer>) -> Self {
        Self { relay }
    }
}

impl<S> Layer<S> for RelayLogCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        // Use the last module path segment as the source name for a cleaner
        // display, falling back to the event target.
        let source = metadata
            .module_path()
            .map(|path| path.rsplit("::").next().unwrap_or(path))
            .unwrap_or_else(|| metadata.target());

        self.relay
            .add_entry(source, LogLevel::from(*metadata.level()), &message);
    }
}

/// Extracts the `message` field from an event, appending any other fields
/// as `key=value` pairs.
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = value.to_string();
        } else {
            if !self.0.is_empty() {
                self.0.push(' ');
            }
            self.0.push_str(&format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{:?}", value);
        } else {
            if !self.0.is_empty() {
                self.0.push(' ');
            }
            self.0.push_str(&format!("{}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{Clients, RelayEvent};
    use std::sync::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Default)]
    struct NullClients {
        broadcasts: Mutex<Vec<RelayEvent>>,
    }

    impl Clients for NullClients {
        fn emit_to(&self, _client: u64, _event: &RelayEvent) {}

        fn broadcast(&self, event: &RelayEvent) {
            self.broadcasts.lock().unwrap().push(event.clone());
        }

        fn broadcast_except(&self, _client: u64, _event: &RelayEvent) {}
    }

    #[test]
    fn tracing_events_land_in_the_relay() {
        let clients = Arc::new(NullClients::default());
        let relay = Arc::new(LogBuffer::new(clients.clone()));
        let subscriber =
            tracing_subscriber::registry().with(RelayLogCollector::new(relay.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk almost full");
        });

        let history = relay.snapshot();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].level, LogLevel::Warn);
        assert_eq!(history[1].message, "disk almost full");
        assert_eq!(clients.broadcasts.lock().unwrap().len(), 1);
    }

    #[test]
    fn extra_fields_are_appended_to_the_message() {
        let clients = Arc::new(NullClients::default());
        let relay = Arc::new(LogBuffer::new(clients));
        let subscriber =
            tracing_subscriber::registry().with(RelayLogCollector::new(relay.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(port = 8080u64, "listening");
        });

        let history = relay.snapshot();
        assert_eq!(history[1].message, "listening port=8080");
    }
}
