/// Gemini `generateContent` wire types and the server-sent-event framing
/// used by `streamGenerateContent?alt=sse`.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single user turn, plain-text response.
    pub fn user_text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts: Some(vec![Part { text: Some(prompt.to_owned()) }]),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "text/plain".into(),
            },
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Part {
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Response  (one per SSE event)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<RemoteError>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined. Events that only carry
    /// metadata (usage, finish reason) yield an empty string.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .flatten()
            .next()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .map(|parts| parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Body of a failed call: `{"error": {"code": 400, "message": ..., "status": ...}}`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorEnvelope {
    pub error: Option<RemoteError>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RemoteError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl RemoteError {
    pub fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match &self.status {
            Some(status) => format!("{status}: {message}"),
            None => message.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// SSE framing
// ---------------------------------------------------------------------------

/// Incremental server-sent-event decoder. Bytes go in as they arrive; the
/// `data` payload of each completed event comes out.
///
/// Events end at a blank line. Network chunks can split an event (or a UTF-8
/// sequence) anywhere, so undecoded bytes are kept until the event closes.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, skip)) = find_event_end(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + skip).take(end).collect();
            if let Some(data) = event_data(&String::from_utf8_lossy(&raw)) {
                events.push(data);
            }
        }
        events
    }

    /// Flush a trailing event that wasn't followed by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buffer);
        event_data(&String::from_utf8_lossy(&raw))
    }
}

/// Position of the first blank-line terminator and its length.
fn find_event_end(buf: &[u8]) -> Option<(usize, usize)> {
    (0..buf.len()).find_map(|i| {
        if buf[i..].starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else if buf[i..].starts_with(b"\n\n") {
            Some((i, 2))
        } else {
            None
        }
    })
}

/// Join the `data:` lines of one event. Comments and other fields are ignored.
fn event_data(event: &str) -> Option<String> {
    let lines: Vec<&str> = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();
    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}
