//! Incremental server-sent events parser.

use std::time::Duration;

use tracing::warn;

/// Longest line kept; longer lines are dropped up to their newline.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// One dispatched SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// `event:` field; `None` means the default `message` type.
    pub event: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// Whether this is an unnamed (default `message`) event.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

/// Buffers raw body chunks and yields complete events.
///
/// Chunks may split lines or even UTF-8 sequences anywhere; only complete
/// lines are interpreted. Only the unfinished tail of the last chunk is
/// buffered, and never more than `max_line_bytes` of it.
#[derive(Debug)]
pub struct SseParser {
    partial: Vec<u8>,
    /// Inside an oversized line; skip to the next newline.
    discarding: bool,
    max_line_bytes: usize,
    data: Vec<String>,
    event: Option<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl Default for SseParser {
    fn default() -> Self {
        Self {
            partial: Vec::new(),
            discarding: false,
            max_line_bytes: MAX_LINE_BYTES,
            data: Vec::new(),
            event: None,
            last_event_id: None,
            retry: None,
        }
    }
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }

    /// Feed a chunk and return every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            let head = &rest[..pos];
            rest = &rest[pos + 1..];

            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if self.partial.len() + head.len() > self.max_line_bytes {
                warn!(
                    bytes = self.partial.len() + head.len(),
                    max = self.max_line_bytes,
                    "Dropping oversized SSE line"
                );
                self.partial.clear();
                continue;
            }

            let event = if self.partial.is_empty() {
                self.process_raw_line(head)
            } else {
                let mut line = std::mem::take(&mut self.partial);
                line.extend_from_slice(head);
                let event = self.process_raw_line(&line);
                line.clear();
                self.partial = line;
                event
            };
            events.extend(event);
        }

        if !self.discarding {
            if self.partial.len() + rest.len() > self.max_line_bytes {
                warn!(
                    bytes = self.partial.len() + rest.len(),
                    max = self.max_line_bytes,
                    "Dropping oversized SSE line"
                );
                self.partial.clear();
                self.discarding = true;
            } else {
                self.partial.extend_from_slice(rest);
            }
        }
        events
    }

    /// Reconnection delay advertised by the server, if any.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    fn process_raw_line(&mut self, line: &[u8]) -> Option<SseEvent> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let line = String::from_utf8_lossy(line);
        self.process_line(&line)
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.trim().parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.data).join("\n"),
            id: self.last_event_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: {\"a\":1}\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert!(events[0].is_message());
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"da").is_empty());
        assert!(parser.feed(b"ta: hel").is_empty());
        assert!(parser.feed(b"lo\r\n").is_empty());
        let events = parser.feed(b"\r\n");

        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multiline_data_and_fields() {
        let mut parser = SseParser::new();
        let events = parser.feed(
            b": keep-alive\nid: 42\nevent: ping\ndata: line1\ndata: line2\nretry: 5000\n\n",
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2");
        assert_eq!(events[0].event.as_deref(), Some("ping"));
        assert_eq!(events[0].id.as_deref(), Some("42"));
        assert!(!events[0].is_message());
        assert_eq!(parser.retry(), Some(Duration::from_millis(5000)));
        assert_eq!(parser.last_event_id(), Some("42"));
    }

    #[test]
    fn test_blank_line_without_data_dispatches_nothing() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"event: noop\n\n").is_empty());

        // The event name does not leak into the next event.
        let events = parser.feed(b"data: x\n\n");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn test_invalid_retry_is_ignored() {
        let mut parser = SseParser::new();
        parser.feed(b"retry: soon\n\n");
        assert_eq!(parser.retry(), None);
    }

    #[test]
    fn test_multibyte_split() {
        let mut parser = SseParser::new();
        let bytes = "data: 40.7°\n\n".as_bytes();
        let split = bytes.len() - 3;
        assert!(parser.feed(&bytes[..split]).is_empty());
        let events = parser.feed(&bytes[split..]);
        assert_eq!(events[0].data, "40.7°");
    }

    #[test]
    fn test_many_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let body: String = (0..5000).map(|i| format!("id: {}\ndata: {}\n\n", i, i)).collect();
        let events = parser.feed(body.as_bytes());

        assert_eq!(events.len(), 5000);
        assert_eq!(events[4999].data, "4999");
        assert_eq!(parser.last_event_id(), Some("4999"));
    }

    #[test]
    fn test_oversized_line_without_newline_is_dropped() {
        let mut parser = SseParser::new().with_max_line_bytes(16);
        assert!(parser.feed(b"data: aaaaaaaa").is_empty());
        // Crosses the cap mid-line; nothing more is buffered until a newline.
        assert!(parser.feed(b"bbbbbbbbbbbbbbbb").is_empty());
        assert!(parser.feed(b"cccccccccccccccc").is_empty());
        assert!(parser.partial.is_empty());

        let events = parser.feed(b"ccc\n\ndata: ok\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "ok");
    }

    #[test]
    fn test_oversized_complete_line_is_dropped() {
        let mut parser = SseParser::new().with_max_line_bytes(16);
        let events = parser.feed(b"data: this line is far too long\ndata: short\n\n");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "short");
    }
}
