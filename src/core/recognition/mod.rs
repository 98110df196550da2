//! Audio recognition over a streaming multimodal chat-completion API.
//!
//! This module forwards an audio clip (remote URL or local file) together with
//! a natural-language task prompt to an OpenAI-compatible
//! `/chat/completions` endpoint and accumulates the streamed answer:
//!
//! - Remote URLs are passed through; local files are inlined as
//!   `data:;base64,...` URIs
//! - The request asks for `["text", "audio"]` output and streams the result
//! - Audio transcripts and text content from every delta are concatenated in
//!   arrival order
//!
//! The module is organized into focused submodules:
//!
//! - [`source`]: `AudioSource` classification and payload encoding
//! - [`messages`]: Request/response types for the chat-completions API
//! - [`stream`]: SSE decoding and transcript accumulation
//! - `client`: The async `AudioRecognitionClient`
//! - `blocking`: `BlockingAudioRecognizer`, the synchronous facade
//!
//! # Example
//!
//! ```rust,no_run
//! use audio_recognition::config::ClientConfig;
//! use audio_recognition::core::recognition::BlockingAudioRecognizer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let recognizer = BlockingAudioRecognizer::new(config)?;
//!
//! let text = recognizer.speech_to_text("./meeting.wav", "Summarize this meeting")?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

mod base;
mod blocking;
mod client;
pub mod messages;
pub mod source;
pub mod stream;


pub use base::{RecognitionError, RecognitionResult};
pub use blocking::{BlockingAudioRecognizer, TOOL_DESCRIPTION, TOOL_NAME};
pub use client::{AudioRecognitionClient, ChatCompletionsApi};
pub use messages::{ChatCompletionChunk, ChatCompletionRequest, EncodedAudioPayload, Usage};
pub use source::AudioSource;
pub use stream::{SseDecoder, SseEvent, TranscriptAccumulator};
