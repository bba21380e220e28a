//! Wire types for the Messages API, plus the SSE framing used by the
//! streaming variant.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A single conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

/// Body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// One content block of a non-streaming response. Anything that is not
/// plain text (tool use, refusal blocks, future block types) lands in
/// `Other` and is treated as an unusable response by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Body of a non-streaming `POST /v1/messages` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessagesResponse {
    /// The response text, if and only if the first content block is text.
    pub fn first_text(self) -> Option<String> {
        match self.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Streaming events
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Extract the text fragment from one SSE `data:` payload, if it is a
/// `content_block_delta` carrying a `text_delta`. All other event types
/// (message_start, ping, message_stop, ...) yield `None`.
pub fn sse_text_delta(data: &str) -> Option<String> {
    let event: StreamEvent = serde_json::from_str(data).ok()?;
    if event.kind != "content_block_delta" {
        return None;
    }
    let delta = event.delta?;
    if delta.kind != "text_delta" {
        return None;
    }
    delta.text
}

/// Reassembles SSE `data:` payloads from arbitrarily chunked network reads.
///
/// SSE frames are newline-delimited, but a chunk boundary can fall anywhere
/// -- including inside a multi-byte UTF-8 sequence -- so buffering happens
/// at the byte level and decoding only on completed lines.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the `data:` payloads of all lines completed
    /// by it, in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
        payloads
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- response parsing --

    #[test]
    fn text_block_parses() {
        let json = r#"{"content": [{"type": "text", "text": "hello"}], "stop_reason": "end_turn"}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text().as_deref(), Some("hello"));
    }

    #[test]
    fn non_text_block_yields_none() {
        let json = r#"{"content": [{"type": "tool_use", "id": "x", "name": "t", "input": {}}]}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn empty_content_yields_none() {
        let json = r#"{"content": []}"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_text().is_none());
    }

    // -- SSE delta extraction --

    #[test]
    fn text_delta_extracted() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"概要"}}"#;
        assert_eq!(sse_text_delta(data).as_deref(), Some("概要"));
    }

    #[test]
    fn other_events_skipped() {
        assert!(sse_text_delta(r#"{"type":"message_start","message":{}}"#).is_none());
        assert!(sse_text_delta(r#"{"type":"ping"}"#).is_none());
        assert!(sse_text_delta(r#"{"type":"message_stop"}"#).is_none());
    }

    #[test]
    fn non_text_delta_skipped() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"input_json_delta","partial_json":"{}"}}"#;
        assert!(sse_text_delta(data).is_none());
    }

    #[test]
    fn garbage_skipped() {
        assert!(sse_text_delta("not json").is_none());
    }

    // -- line buffering --

    #[test]
    fn whole_lines_pass_through() {
        let mut buffer = SseLineBuffer::new();
        let payloads = buffer.push(b"event: foo\ndata: one\ndata: two\n");
        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn split_line_is_buffered() {
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(b"data: par").is_empty());
        assert_eq!(buffer.push(b"tial\n"), vec!["partial"]);
    }

    #[test]
    fn crlf_stripped() {
        let mut buffer = SseLineBuffer::new();
        assert_eq!(buffer.push(b"data: x\r\n"), vec!["x"]);
    }

    #[test]
    fn non_data_lines_ignored() {
        let mut buffer = SseLineBuffer::new();
        assert!(buffer.push(b"event: content_block_delta\n: comment\n\n").is_empty());
    }

    #[test]
    fn chunk_boundary_inside_multibyte_char() {
        let mut buffer = SseLineBuffer::new();
        let bytes = "data: 日本語\n".as_bytes();
        // Split in the middle of 日 (3-byte sequence).
        assert!(buffer.push(&bytes[..8]).is_empty());
        assert_eq!(buffer.push(&bytes[8..]), vec!["日本語"]);
    }
}
