//! Real-time event subscription over server-sent events.
//!
//! An [`EventStream`] owns one background task holding a long-lived
//! connection to `{base_url}/events/stream`. Each message is validated as an
//! [`EventPayload`](geolayers_types::EventPayload) and fanned out on
//! [`Topic::All`] and the payload's provider topic; failures go to
//! [`Topic::Error`]. Dropped connections are retried after the server's
//! `retry:` interval until [`EventStream::disconnect`].

pub mod bus;
pub mod sse;

pub use bus::{decode_payload, EventBus, StreamError, StreamMessage, Topic};
pub use sse::{SseEvent, SseParser};

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::GeoLayersConfig;
use crate::error::ConfigError;

/// Reconnect delay used until the server advertises one.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Push-event subscription channel.
pub struct EventStream {
    url: Url,
    client: reqwest::Client,
    bus: Arc<EventBus>,
    reconnect_delay: Duration,
    task: Option<JoinHandle<()>>,
}

impl EventStream {
    pub fn new(config: &GeoLayersConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        // No overall timeout: the response body never completes.
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            url: Self::stream_url(config)?,
            client,
            bus: Arc::new(EventBus::default()),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            task: None,
        })
    }

    /// `{base_url}/events/stream?apiKey={key}`.
    pub fn stream_url(config: &GeoLayersConfig) -> Result<Url, ConfigError> {
        let raw = format!("{}/events/stream", config.base_url_trimmed());
        let mut url = Url::parse(&raw).map_err(|e| ConfigError::Invalid {
            field: "base_url",
            message: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("apiKey", &config.api_key);
        Ok(url)
    }

    /// Delay before reconnecting when the server has not sent `retry:`.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Start the background connection. Does nothing if already running.
    /// Must be called from within a Tokio runtime.
    pub fn connect(&mut self) -> Result<(), ConfigError> {
        if self.is_connected() {
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|e| ConfigError::Runtime(e.to_string()))?;
        info!(path = %self.url.path(), "Connecting to event stream");

        let task = handle.spawn(run(
            self.client.clone(),
            self.url.clone(),
            self.bus.clone(),
            self.reconnect_delay,
        ));
        self.task = Some(task);
        Ok(())
    }

    /// Stop the background connection.
    pub fn disconnect(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Disconnected from event stream");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Receive messages for `topic`. Subscriptions made before
    /// [`connect`](Self::connect) see every message.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<StreamMessage> {
        self.bus.subscribe(topic)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("path", &self.url.path())
            .field("reconnect_delay", &self.reconnect_delay)
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn run(client: reqwest::Client, url: Url, bus: Arc<EventBus>, default_delay: Duration) {
    let mut delay = default_delay;
    let mut last_event_id: Option<String> = None;

    loop {
        let mut parser = SseParser::new();
        let result = stream_once(&client, &url, last_event_id.as_deref(), &bus, &mut parser).await;

        match result {
            Ok(()) => {
                debug!("Event stream ended");
                bus.publish_error(StreamError::Closed);
            }
            Err(e) => {
                warn!(error = %e, "Event stream failed");
                bus.publish_error(e);
            }
        }

        if let Some(retry) = parser.retry() {
            delay = retry;
        }
        if let Some(id) = parser.last_event_id() {
            last_event_id = Some(id.to_string());
        }

        debug!(delay_ms = delay.as_millis() as u64, "Reconnecting to event stream");
        tokio::time::sleep(delay).await;
    }
}

async fn stream_once(
    client: &reqwest::Client,
    url: &Url,
    last_event_id: Option<&str>,
    bus: &EventBus,
    parser: &mut SseParser,
) -> Result<(), StreamError> {
    let mut request = client
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache");
    if let Some(id) = last_event_id {
        request = request.header("Last-Event-ID", id);
    }

    let response = request
        .send()
        .await
        .map_err(|e| StreamError::Connection(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(StreamError::Status(status.as_u16()));
    }
    info!("Event stream connected");

    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| StreamError::Connection(e.to_string()))?;
        for event in parser.feed(&chunk) {
            if event.is_message() {
                bus.dispatch(&event.data);
            } else {
                debug!(event = ?event.event, "Ignoring named event");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_encodes_key() {
        let config = GeoLayersConfig::new("https://api.test.com/", "a b&c");
        let url = EventStream::stream_url(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.test.com/events/stream?apiKey=a+b%26c"
        );
    }

    #[test]
    fn test_connect_outside_runtime_fails() {
        let config = GeoLayersConfig::new("https://api.test.com", "k");
        let mut stream = EventStream::new(&config).unwrap();

        assert!(matches!(stream.connect(), Err(ConfigError::Runtime(_))));
        assert!(!stream.is_connected());
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_and_disconnect_stops() {
        // Nothing listens here; the task keeps retrying until aborted.
        let config = GeoLayersConfig::new("http://127.0.0.1:9", "k");
        let mut stream = EventStream::new(&config)
            .unwrap()
            .with_reconnect_delay(Duration::from_secs(60));

        stream.connect().unwrap();
        assert!(stream.is_connected());
        stream.connect().unwrap();
        assert!(stream.is_connected());

        stream.disconnect();
        assert!(!stream.is_connected());
        stream.disconnect();
    }
}
