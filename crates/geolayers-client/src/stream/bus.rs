//! Topic fan-out for stream messages.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use geolayers_types::EventPayload;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::error::ValidationError;

/// Per-topic channel capacity. Receivers that fall further behind lag.
pub const DEFAULT_CAPACITY: usize = 256;

/// Where a message is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Every valid payload.
    All,
    /// Payloads whose `provider` matches.
    Provider(String),
    /// Decode, validation and connection failures.
    Error,
}

impl Topic {
    pub fn provider(name: impl Into<String>) -> Self {
        Topic::Provider(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    #[error("Event stream connection failed: {0}")]
    Connection(String),

    #[error("Event stream returned HTTP {0}")]
    Status(u16),

    #[error("Event data is not valid JSON: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Event stream closed by server")]
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Event(EventPayload),
    Error(StreamError),
}

impl StreamMessage {
    pub fn as_event(&self) -> Option<&EventPayload> {
        match self {
            StreamMessage::Event(payload) => Some(payload),
            StreamMessage::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&StreamError> {
        match self {
            StreamMessage::Error(e) => Some(e),
            StreamMessage::Event(_) => None,
        }
    }
}

/// Broadcast channels keyed by topic, created on first subscription.
#[derive(Debug)]
pub struct EventBus {
    capacity: usize,
    senders: Mutex<HashMap<Topic, broadcast::Sender<StreamMessage>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            senders: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<StreamMessage> {
        self.lock()
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver to current subscribers of `topic`. Returns how many got it.
    pub fn publish(&self, topic: &Topic, message: StreamMessage) -> usize {
        match self.lock().get(topic) {
            Some(sender) => sender.send(message).unwrap_or(0),
            None => 0,
        }
    }

    pub fn publish_error(&self, error: StreamError) -> usize {
        self.publish(&Topic::Error, StreamMessage::Error(error))
    }

    /// Decode one `data` block and fan it out: `All` plus the provider topic
    /// on success, `Error` on failure.
    pub fn dispatch(&self, data: &str) {
        match decode_payload(data) {
            Ok(payload) => {
                let provider = Topic::Provider(payload.provider.clone());
                self.publish(&Topic::All, StreamMessage::Event(payload.clone()));
                self.publish(&provider, StreamMessage::Event(payload));
            }
            Err(e) => {
                self.publish_error(e);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Topic, broadcast::Sender<StreamMessage>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parse and validate an event payload.
pub fn decode_payload(data: &str) -> Result<EventPayload, StreamError> {
    let raw: Value = serde_json::from_str(data).map_err(|e| StreamError::Decode(e.to_string()))?;
    serde_json::from_value(raw)
        .map_err(|e| ValidationError::single("event payload", "", e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::events;

    #[test]
    fn test_dispatch_fans_out_to_all_and_provider() {
        let bus = EventBus::default();
        let mut all = bus.subscribe(Topic::All);
        let mut quakes = bus.subscribe(Topic::provider("earthquakes"));
        let mut fires = bus.subscribe(Topic::provider("wildfires"));
        let mut errors = bus.subscribe(Topic::Error);

        bus.dispatch(&events::payload("earthquakes").to_string());

        let message = all.try_recv().unwrap();
        assert_eq!(message.as_event().unwrap().provider, "earthquakes");
        assert_eq!(quakes.try_recv().unwrap(), message);
        assert!(fires.try_recv().is_err());
        assert!(errors.try_recv().is_err());
    }

    #[test]
    fn test_invalid_json_goes_to_error() {
        let bus = EventBus::default();
        let mut all = bus.subscribe(Topic::All);
        let mut errors = bus.subscribe(Topic::Error);

        bus.dispatch("not json");

        assert!(matches!(
            errors.try_recv().unwrap().as_error(),
            Some(StreamError::Decode(_))
        ));
        assert!(all.try_recv().is_err());
    }

    #[test]
    fn test_schema_mismatch_goes_to_error() {
        let bus = EventBus::default();
        let mut errors = bus.subscribe(Topic::Error);

        bus.dispatch(r#"{"provider":"x","type":"Polygon","timestamp":"t"}"#);

        assert!(matches!(
            errors.try_recv().unwrap().as_error(),
            Some(StreamError::Validation(_))
        ));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.publish_error(StreamError::Closed), 0);

        let _rx = bus.subscribe(Topic::Error);
        assert_eq!(bus.publish_error(StreamError::Closed), 1);
    }

    #[test]
    fn test_decode_payload_action_optional() {
        let mut raw = events::payload("storms");
        raw.as_object_mut().unwrap().remove("action");

        let payload = decode_payload(&raw.to_string()).unwrap();
        assert_eq!(payload.provider, "storms");
        assert_eq!(payload.action, None);
    }
}
