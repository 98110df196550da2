//! Audio recognition client implementation.
//!
//! # Architecture
//!
//! 1. Classify the source (remote URL or local file) and build the
//!    `input_audio` payload
//! 2. Send a single streaming chat-completion request with the audio and the
//!    task prompt
//! 3. Decode the SSE body chunk by chunk and concatenate every transcript and
//!    content fragment in arrival order
//!
//! The HTTP client is created on first use and reused for every later call on
//! the same instance (connection pooling).

use futures::StreamExt;
use once_cell::sync::OnceCell;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::base::{RecognitionError, RecognitionResult};
use super::messages::{ChatCompletionRequest, OpenAIErrorResponse};
use super::source::AudioSource;
use super::stream::{SseDecoder, SseEvent, TranscriptAccumulator};
use crate::config::ClientConfig;

// =============================================================================
// Remote Service Handle
// =============================================================================

/// Handle to the remote chat-completions endpoint.
///
/// Owns the pooled HTTP client, the resolved endpoint URL and the bearer key.
pub struct ChatCompletionsApi {
    http_client: Client,
    endpoint: String,
    api_key: Zeroizing<String>,
}

impl ChatCompletionsApi {
    /// Build the handle. No network traffic happens here.
    pub fn new(config: &ClientConfig) -> RecognitionResult<Self> {
        let http_client = Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| {
                RecognitionError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            endpoint: config.chat_completions_url(),
            api_key: Zeroizing::new(config.api_key.clone()),
        })
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `request` and drain the streamed response.
    ///
    /// Fails before yielding any text if the request cannot be sent or the
    /// service answers with a non-2xx status.
    pub async fn stream_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> RecognitionResult<TranscriptAccumulator> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| RecognitionError::ConnectionFailed(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<OpenAIErrorResponse>(&body) {
                Ok(error_response) => error_response.error.to_string(),
                Err(_) if body.trim().is_empty() => status.to_string(),
                Err(_) => body,
            };
            warn!("Chat completion request rejected ({}): {}", status, message);

            return Err(match status.as_u16() {
                401 | 403 => RecognitionError::AuthenticationFailed(message),
                code => RecognitionError::ProviderError {
                    status: code,
                    message,
                },
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut accumulator = TranscriptAccumulator::new();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| {
                RecognitionError::ConnectionFailed(format!("Stream interrupted: {e}"))
            })?;
            apply_events(&mut accumulator, decoder.push(&bytes)?)?;
            if decoder.is_done() {
                break;
            }
        }
        apply_events(&mut accumulator, decoder.finish()?)?;

        Ok(accumulator)
    }
}

fn apply_events(
    accumulator: &mut TranscriptAccumulator,
    events: Vec<SseEvent>,
) -> RecognitionResult<()> {
    for event in events {
        match event {
            SseEvent::Data(data) => accumulator.push_event(&data)?,
            SseEvent::Done => debug!("Received end-of-stream marker"),
        }
    }
    Ok(())
}

// =============================================================================
// Audio Recognition Client
// =============================================================================

/// Forwards an audio clip and a task prompt to a multimodal chat-completion
/// service and returns the streamed answer as one string.
///
/// # Example
///
/// ```rust,no_run
/// use audio_recognition::config::ClientConfig;
/// use audio_recognition::core::recognition::AudioRecognitionClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("sk-...", "https://api.openai.com/v1", "gpt-4o-audio-preview");
///     let client = AudioRecognitionClient::new(config)?;
///
///     let text = client
///         .recognize("https://example.com/clip.mp3", "Transcribe this recording")
///         .await?;
///     println!("{text}");
///     Ok(())
/// }
/// ```
pub struct AudioRecognitionClient {
    config: ClientConfig,
    api: OnceCell<Arc<ChatCompletionsApi>>,
}

impl AudioRecognitionClient {
    /// Create a client. Validates `config` but performs no I/O.
    pub fn new(config: ClientConfig) -> RecognitionResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            api: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The remote service handle, created on first access and shared after.
    pub fn api(&self) -> RecognitionResult<Arc<ChatCompletionsApi>> {
        self.api
            .get_or_try_init(|| {
                debug!(
                    "Creating chat completions handle for {}",
                    self.config.chat_completions_url()
                );
                ChatCompletionsApi::new(&self.config).map(Arc::new)
            })
            .cloned()
    }

    /// Recognize `source` (URL or local path) according to `prompt`.
    ///
    /// Returns the concatenation of every transcript and content fragment in
    /// the stream. Fragments with an unexpected shape are skipped; transport
    /// and service failures are returned as errors with no partial text.
    pub async fn recognize(&self, source: &str, prompt: &str) -> RecognitionResult<String> {
        let source = AudioSource::classify(source);
        let payload = source.encode().await?;

        info!(
            "Recognizing {} audio (format: {:?}, prompt: {} chars)",
            source.kind(),
            payload.format,
            prompt.chars().count()
        );

        let request = ChatCompletionRequest::for_audio(&self.config.model, payload, prompt);
        let api = self.api()?;

        let started = Instant::now();
        let accumulator = api.stream_completion(&request).await?;

        if accumulator.skipped_fragments() > 0 {
            warn!(
                "Skipped {} malformed fragments while reading the stream",
                accumulator.skipped_fragments()
            );
        }
        if let Some(usage) = accumulator.usage() {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        info!(
            "Recognition complete: {} characters from {} chunks in {:?}",
            accumulator.text().chars().count(),
            accumulator.chunk_count(),
            started.elapsed()
        );

        Ok(accumulator.finish())
    }
}

impl std::fmt::Debug for AudioRecognitionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioRecognitionClient")
            .field("config", &self.config)
            .field("api_initialized", &self.api.get().is_some())
            .finish()
    }
}
