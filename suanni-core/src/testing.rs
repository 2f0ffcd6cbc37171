//! Testing utilities.
//!
//! `ScriptedNarrator` stands in for the generative service so the whole
//! pipeline, relay included, can be exercised without network access.

use crate::interpret::Narrator;
use async_trait::async_trait;
use bytes::Bytes;
use claude::{ByteStream, Request};
use serde_json::json;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Text returned once the script has run out.
pub const SCRIPT_EXHAUSTED: &str = "沒有更多預設回應。";

/// One scripted answer from the narrator.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Raw body chunks, delivered exactly as split here.
    Chunks(Vec<Bytes>),
    /// A complete, non-streaming answer.
    Text(String),
    /// A non-success status before any byte is streamed.
    Refuse { status: u16, message: String },
}

impl ScriptedReply {
    /// One chunk per text delta, followed by the `message_stop` frame.
    pub fn deltas(texts: &[&str]) -> Self {
        let mut chunks: Vec<Bytes> = texts.iter().map(|text| delta_frame(text).into()).collect();
        chunks.push(Bytes::from_static(
            b"event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n",
        ));
        ScriptedReply::Chunks(chunks)
    }

    /// Raw body split into the given pieces.
    pub fn chunks<I, B>(pieces: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        ScriptedReply::Chunks(pieces.into_iter().map(Into::into).collect())
    }

    pub fn text(text: impl Into<String>) -> Self {
        ScriptedReply::Text(text.into())
    }

    pub fn refuse(status: u16) -> Self {
        ScriptedReply::Refuse {
            status,
            message: "scripted refusal".to_string(),
        }
    }
}

/// An upstream `content_block_delta` frame carrying `text`.
pub fn delta_frame(text: &str) -> String {
    format!(
        "event: content_block_delta\ndata: {}\n\n",
        json!({
            "type": "content_block_delta",
            "index": 0,
            "delta": {"type": "text_delta", "text": text}
        })
    )
}

/// A narrator that plays back scripted replies in order.
///
/// Every request it receives is recorded for later inspection.
#[derive(Debug, Default)]
pub struct ScriptedNarrator {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedNarrator {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self, request: Request) -> Option<ScriptedReply> {
        self.requests.lock().await.push(request);
        self.replies.lock().await.pop_front()
    }
}

#[async_trait]
impl Narrator for ScriptedNarrator {
    async fn open_stream(&self, request: Request) -> Result<ByteStream, claude::Error> {
        let chunks = match self.next_reply(request).await {
            Some(ScriptedReply::Chunks(chunks)) => chunks,
            Some(ScriptedReply::Text(text)) => vec![delta_frame(&text).into()],
            Some(ScriptedReply::Refuse { status, message }) => {
                return Err(claude::Error::Api { status, message })
            }
            None => vec![delta_frame(SCRIPT_EXHAUSTED).into()],
        };
        Ok(Box::pin(futures::stream::iter(
            chunks.into_iter().map(Ok::<Bytes, claude::Error>),
        )))
    }

    async fn complete(&self, request: Request) -> Result<String, claude::Error> {
        match self.next_reply(request).await {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Chunks(chunks)) => Ok(chunks
                .iter()
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                .collect()),
            Some(ScriptedReply::Refuse { status, message }) => {
                Err(claude::Error::Api { status, message })
            }
            None => Ok(SCRIPT_EXHAUSTED.to_string()),
        }
    }
}
