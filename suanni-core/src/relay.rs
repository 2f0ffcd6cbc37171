//! Response relay: upstream SSE bytes in, normalized events out.
//!
//! [`RelayParser`] is a push-driven state machine that can be fed arbitrary
//! chunk splits without a runtime. [`relay_stream`] drives it from an
//! upstream byte stream.
//!
//! Lines that fail to parse are dropped, not reassembled. Upstream is
//! expected to deliver every delta as one complete line; if it ever does
//! not, the text of that line is lost.

use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Display;
use std::pin::Pin;
use tracing::{debug, warn};

/// Prefix of every frame line.
pub const EVENT_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Frame type carrying incremental text.
const TEXT_DELTA: &str = "content_block_delta";

/// A normalized event for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Text(String),
    Done,
}

impl RelayEvent {
    /// `{"text": ...}` or `{"done": true}`.
    pub fn to_json(&self) -> Value {
        match self {
            RelayEvent::Text(text) => json!({ "text": text }),
            RelayEvent::Done => json!({ "done": true }),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RelayEvent::Done)
    }
}

#[derive(Deserialize)]
struct UpstreamFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<UpstreamDelta>,
}

#[derive(Deserialize)]
struct UpstreamDelta {
    #[serde(default)]
    text: Option<String>,
}

impl UpstreamFrame {
    fn into_text(self) -> Option<String> {
        if self.kind != TEXT_DELTA {
            return None;
        }
        self.delta
            .and_then(|delta| delta.text)
            .filter(|text| !text.is_empty())
    }
}

/// Incremental frame parser for one request.
///
/// Holds raw bytes until a newline arrives, so a multi-byte character split
/// across chunks is decoded whole. Emits [`RelayEvent::Done`] exactly once.
#[derive(Debug, Default)]
pub struct RelayParser {
    buffer: BytesMut,
    done: bool,
}

impl RelayParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminal event has been emitted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one chunk and return the events its complete lines produce.
    ///
    /// The trailing partial line stays buffered. Input after the terminal
    /// event is ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<RelayEvent> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }

        self.buffer.extend_from_slice(chunk);
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line = self.buffer.split_to(newline + 1);
            line.truncate(newline);

            if let Some(event) = self.line_event(&line) {
                events.push(event);
                if self.done {
                    self.buffer.clear();
                    break;
                }
            }
        }
        events
    }

    /// Close the stream: examine the unterminated remainder, then emit the
    /// terminal event unless it has already gone out.
    pub fn finish(&mut self) -> Vec<RelayEvent> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }

        let rest = self.buffer.split();
        if let Some(event) = self.line_event(&rest) {
            events.push(event);
        }
        if !self.done {
            self.done = true;
            events.push(RelayEvent::Done);
        }
        events
    }

    fn line_event(&mut self, line: &[u8]) -> Option<RelayEvent> {
        let line = String::from_utf8_lossy(line);
        let payload = line.strip_prefix(EVENT_PREFIX)?.trim();
        if payload.is_empty() {
            return None;
        }
        if payload == DONE_SENTINEL {
            self.done = true;
            return Some(RelayEvent::Done);
        }

        match serde_json::from_str::<UpstreamFrame>(payload) {
            Ok(frame) => frame.into_text().map(RelayEvent::Text),
            Err(e) => {
                debug!(error = %e, len = payload.len(), "discarding unparseable relay line");
                None
            }
        }
    }
}

/// Stream of normalized events for one request.
pub type RelayStream = Pin<Box<dyn Stream<Item = RelayEvent> + Send>>;

/// Relay an upstream byte stream.
///
/// Chunks are parsed strictly in arrival order. The stream ends right after
/// the terminal event and drops `upstream` with it; a transport error ends
/// the stream the same way, since nothing but the terminal event can be
/// signalled once streaming has begun.
pub fn relay_stream<S, E>(upstream: S) -> RelayStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let start = Some((Box::pin(upstream), RelayParser::new()));
    let events = stream::unfold(start, |state| async move {
        let (mut upstream, mut parser) = state?;
        let batch = match upstream.next().await {
            Some(Ok(chunk)) => parser.push(&chunk),
            Some(Err(e)) => {
                warn!(error = %e, "upstream stream failed mid-relay");
                parser.finish()
            }
            None => parser.finish(),
        };
        // Upstream is never polled again once the terminal event is out.
        let next = (!parser.is_done()).then_some((upstream, parser));
        Some((batch, next))
    })
    .flat_map(stream::iter);

    Box::pin(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(text: &str) -> String {
        format!(
            "data: {}\n\n",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": text}})
        )
    }

    fn texts(events: &[RelayEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match event {
                RelayEvent::Text(text) => Some(text.as_str()),
                RelayEvent::Done => None,
            })
            .collect()
    }

    #[test]
    fn test_event_json() {
        assert_eq!(
            RelayEvent::Text("嗨".into()).to_json().to_string(),
            "{\"text\":\"嗨\"}"
        );
        assert_eq!(RelayEvent::Done.to_json().to_string(), "{\"done\":true}");
    }

    #[test]
    fn test_complete_frame_in_one_chunk() {
        let mut parser = RelayParser::new();
        let events = parser.push(delta("你好").as_bytes());
        assert_eq!(events, vec![RelayEvent::Text("你好".into())]);
        assert_eq!(parser.finish(), vec![RelayEvent::Done]);
    }

    #[test]
    fn test_partial_line_is_rebuffered() {
        let mut parser = RelayParser::new();
        let frame = delta("A");
        let (head, tail) = frame.split_at(10);
        assert!(parser.push(head.as_bytes()).is_empty());
        assert_eq!(parser.push(tail.as_bytes()), vec![RelayEvent::Text("A".into())]);
    }

    #[test]
    fn test_non_delta_frames_are_ignored() {
        let mut parser = RelayParser::new();
        let input = concat!(
            "event: message_start\n",
            "data: {\"type\":\"message_start\",\"message\":{}}\n\n",
            "data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"\"}}\n",
            "data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"}}\n",
            ": comment\n",
            "data:    \n",
        );
        assert!(parser.push(input.as_bytes()).is_empty());
    }

    #[test]
    fn test_unparseable_line_is_discarded() {
        let mut parser = RelayParser::new();
        let mut input = String::from("data: {\"type\":\"content_block_del\n");
        input.push_str(&delta("B"));
        assert_eq!(parser.push(input.as_bytes()), vec![RelayEvent::Text("B".into())]);
    }

    #[test]
    fn test_done_sentinel_is_immediate_and_final() {
        let mut parser = RelayParser::new();
        let mut input = delta("A");
        input.push_str("data: [DONE]\n\n");
        input.push_str(&delta("late"));
        input.push_str("data: [DONE]\n");
        let events = parser.push(input.as_bytes());
        assert_eq!(events, vec![RelayEvent::Text("A".into()), RelayEvent::Done]);
        assert!(parser.push(delta("later").as_bytes()).is_empty());
        assert!(parser.finish().is_empty());
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut parser = RelayParser::new();
        let frame = delta("尾");
        assert!(parser.push(frame.trim_end().as_bytes()).is_empty());
        assert_eq!(
            parser.finish(),
            vec![RelayEvent::Text("尾".into()), RelayEvent::Done]
        );
    }

    #[test]
    fn test_finish_with_trailing_sentinel() {
        let mut parser = RelayParser::new();
        parser.push(b"data: [DONE]");
        assert_eq!(parser.finish(), vec![RelayEvent::Done]);
        assert!(parser.finish().is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = RelayParser::new();
        let frame = delta("C").replace('\n', "\r\n");
        assert_eq!(parser.push(frame.as_bytes()), vec![RelayEvent::Text("C".into())]);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let frame = delta("命理");
        let bytes = frame.as_bytes();
        let split = frame.find("理").unwrap() + 1;

        let mut parser = RelayParser::new();
        let mut events = parser.push(&bytes[..split]);
        events.extend(parser.push(&bytes[split..]));
        assert_eq!(texts(&events), vec!["命理"]);
    }

    #[tokio::test]
    async fn test_relay_stream_emits_single_done() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from(delta("一"))),
            Ok(Bytes::from(delta("二"))),
        ];
        let events: Vec<_> = relay_stream(stream::iter(chunks)).collect().await;
        assert_eq!(
            events,
            vec![
                RelayEvent::Text("一".into()),
                RelayEvent::Text("二".into()),
                RelayEvent::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_relay_stream_stops_after_sentinel() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from("data: [DONE]\n")),
            Ok(Bytes::from(delta("ignored"))),
            Ok(Bytes::from("data: [DONE]\n")),
        ];
        let events: Vec<_> = relay_stream(stream::iter(chunks)).collect().await;
        assert_eq!(events, vec![RelayEvent::Done]);
    }

    #[tokio::test]
    async fn test_relay_stream_transport_error_still_terminates() {
        let chunks: Vec<Result<Bytes, String>> = vec![
            Ok(Bytes::from(delta("部分"))),
            Err("connection reset".to_string()),
            Ok(Bytes::from(delta("never"))),
        ];
        let events: Vec<_> = relay_stream(stream::iter(chunks)).collect().await;
        assert_eq!(
            events,
            vec![RelayEvent::Text("部分".into()), RelayEvent::Done]
        );
    }

    #[tokio::test]
    async fn test_relay_stream_closes_while_upstream_is_quiet() {
        let upstream = stream::iter(vec![Ok::<_, String>(Bytes::from("data: [DONE]\n"))])
            .chain(stream::pending());
        let events = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            relay_stream(upstream).collect::<Vec<_>>(),
        )
        .await
        .expect("relay should close right after the sentinel");
        assert_eq!(events, vec![RelayEvent::Done]);
    }
}
