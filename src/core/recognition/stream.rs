//! Server-sent event decoding and transcript accumulation.
//!
//! The provider streams `chat.completion.chunk` objects as SSE `data:`
//! events terminated by `data: [DONE]`. Network reads may split an event (or
//! a line) anywhere, so [`SseDecoder`] buffers until a full line is available.

use serde_json::Value;
use tracing::debug;

use super::base::{RecognitionError, RecognitionResult};
use super::messages::{ChatCompletionChunk, OpenAIErrorResponse, Usage};

/// Sentinel payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Status attached to errors the provider sends inside an accepted stream.
pub const STREAMED_ERROR_STATUS: u16 = 200;

/// A complete event produced by [`SseDecoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of one `data:` event (multi-line data joined with `\n`).
    Data(String),
    /// The `[DONE]` sentinel.
    Done,
}

/// Incremental SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen. Later input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes and return every event completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> RecognitionResult<Vec<SseEvent>> {
        let mut events = Vec::new();
        if self.done {
            return Ok(events);
        }

        self.buffer.extend_from_slice(bytes);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = decode_line(&line)?;
            self.process_line(line.trim_end_matches(['\r', '\n']), &mut events);
            if self.done {
                self.buffer.clear();
                break;
            }
        }

        Ok(events)
    }

    /// Flush whatever is left once the underlying stream has ended.
    pub fn finish(&mut self) -> RecognitionResult<Vec<SseEvent>> {
        let mut events = Vec::new();
        if self.done {
            return Ok(events);
        }

        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = decode_line(&rest)?;
            self.process_line(line.trim_end_matches('\r'), &mut events);
        }
        self.dispatch(&mut events);

        Ok(events)
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(events);
            return;
        }

        // Comment / keep-alive
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        // `event:`, `id:` and `retry:` carry nothing we use.
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.data_lines.is_empty() {
            return;
        }

        let data = self.data_lines.join("\n");
        self.data_lines.clear();

        if data.trim() == DONE_SENTINEL {
            self.done = true;
            events.push(SseEvent::Done);
        } else {
            events.push(SseEvent::Data(data));
        }
    }
}

fn decode_line(line: &[u8]) -> RecognitionResult<&str> {
    std::str::from_utf8(line)
        .map_err(|e| RecognitionError::StreamError(format!("Invalid UTF-8 in stream: {e}")))
}

/// Concatenates transcript and content fragments in arrival order.
///
/// Only the first choice of each chunk is considered. Within a delta the
/// audio transcript is appended before the text content. Fragments with an
/// unexpected shape are skipped and counted; they never abort the stream.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    text: String,
    usage: Option<Usage>,
    chunks: usize,
    skipped_fragments: usize,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one SSE data payload and apply it.
    ///
    /// An `{"error": {...}}` event sent mid-stream fails with
    /// [`RecognitionError::ProviderError`].
    pub fn push_event(&mut self, data: &str) -> RecognitionResult<()> {
        let value: Value = serde_json::from_str(data)
            .map_err(|e| RecognitionError::StreamError(format!("Invalid chunk: {e}")))?;

        if value.get("error").is_some_and(|error| !error.is_null()) {
            let message = match serde_json::from_value::<OpenAIErrorResponse>(value.clone()) {
                Ok(response) => response.error.to_string(),
                Err(_) => value["error"].to_string(),
            };
            return Err(RecognitionError::ProviderError {
                status: STREAMED_ERROR_STATUS,
                message,
            });
        }

        let chunk: ChatCompletionChunk = serde_json::from_value(value)
            .map_err(|e| RecognitionError::StreamError(format!("Invalid chunk: {e}")))?;
        self.push_chunk(&chunk);
        Ok(())
    }

    pub fn push_chunk(&mut self, chunk: &ChatCompletionChunk) {
        self.chunks += 1;

        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }

        let Some(choice) = chunk.choices.first() else {
            return;
        };
        let delta = &choice.delta;

        if let Some(transcript) = delta.transcript() {
            self.text.push_str(transcript);
        } else if delta.has_unreadable_audio() {
            self.skipped_fragments += 1;
            debug!("Skipping audio delta without a transcript");
        }

        if let Some(content) = delta.text() {
            self.text.push_str(content);
        } else if delta.has_unreadable_content() {
            self.skipped_fragments += 1;
            debug!("Skipping non-string content delta");
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn usage(&self) -> Option<Usage> {
        self.usage
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn skipped_fragments(&self) -> usize {
        self.skipped_fragments
    }

    pub fn finish(self) -> String {
        self.text
    }
}
