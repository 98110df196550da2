//! Synchronous facade over [`AudioRecognitionClient`].
//!
//! Each facade owns a current-thread tokio runtime built once at
//! construction; `speech_to_text` drives the async recognition on it and
//! blocks until the stream is drained. Do not call it from inside an async
//! runtime.

use tokio::runtime::{Builder, Runtime};
use tracing::info;

use super::base::{RecognitionError, RecognitionResult};
use super::client::AudioRecognitionClient;
use crate::config::ClientConfig;

/// Name under which the recognizer is exposed to agents and logs.
pub const TOOL_NAME: &str = "Audio Tool";

/// Human-readable summary shown alongside [`TOOL_NAME`].
pub const TOOL_DESCRIPTION: &str =
    "Describes the contents of an audio clip using a multimodal chat-completion API.";

/// Blocking wrapper used by synchronous callers (CLI, tool runners).
pub struct BlockingAudioRecognizer {
    client: AudioRecognitionClient,
    runtime: Runtime,
}

impl BlockingAudioRecognizer {
    pub fn new(config: ClientConfig) -> RecognitionResult<Self> {
        let client = AudioRecognitionClient::new(config)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                RecognitionError::ConfigurationError(format!("Failed to create runtime: {e}"))
            })?;

        Ok(Self { client, runtime })
    }

    pub fn client(&self) -> &AudioRecognitionClient {
        &self.client
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    #[inline]
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Recognize `audio_path` (URL or local path) and block until done.
    pub fn speech_to_text(&self, audio_path: &str, task_prompt: &str) -> RecognitionResult<String> {
        info!(
            "Using Tool: {}, audio_path: {}, task_prompt: {}",
            TOOL_NAME, audio_path, task_prompt
        );
        self.runtime
            .block_on(self.client.recognize(audio_path, task_prompt))
    }
}
