//! Message types for the streaming chat-completions API.
//!
//! Request types mirror the OpenAI-compatible `POST /chat/completions` body
//! with an `input_audio` content part. Response types cover the streamed
//! `chat.completion.chunk` objects and the error envelope.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Request Types
// =============================================================================

/// Voice requested for the audio half of the response.
pub const OUTPUT_AUDIO_VOICE: &str = "Cherry";

/// Container format requested for the audio half of the response.
pub const OUTPUT_AUDIO_FORMAT: &str = "wav";

/// Audio handed to the provider: a passthrough URL or an inline data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAudioPayload {
    /// Remote URL or `data:;base64,...` URI.
    pub data: String,
    /// File extension including the leading dot, e.g. `.mp3`.
    pub format: String,
}

/// Output modalities the request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Audio,
}

/// One part of a multimodal user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputAudio { input_audio: EncodedAudioPayload },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioOutputOptions {
    pub voice: String,
    pub format: String,
}

impl Default for AudioOutputOptions {
    fn default() -> Self {
        Self {
            voice: OUTPUT_AUDIO_VOICE.to_string(),
            format: OUTPUT_AUDIO_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

/// Streaming chat-completion request carrying one audio clip and one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub modalities: Vec<Modality>,
    pub audio: AudioOutputOptions,
    pub stream: bool,
    pub stream_options: StreamOptions,
}

impl ChatCompletionRequest {
    /// Build the single-message request for `audio` and `prompt`.
    pub fn for_audio(model: &str, audio: EncodedAudioPayload, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::InputAudio { input_audio: audio },
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            modalities: vec![Modality::Text, Modality::Audio],
            audio: AudioOutputOptions::default(),
            stream: true,
            stream_options: StreamOptions {
                include_usage: true,
            },
        }
    }
}

// =============================================================================
// Streamed Response Types
// =============================================================================

/// One `chat.completion.chunk` object from the stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<ChunkChoice>,

    /// Only present on the final chunk when usage accounting is requested.
    /// A usage object of the wrong shape reads as `None`.
    #[serde(default, deserialize_with = "lenient_usage")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub delta: ChunkDelta,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental update carried by a choice.
///
/// Both fields are kept as raw JSON so that an unexpected shape in one of
/// them only drops that fragment, never the whole chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<Value>,

    #[serde(default)]
    pub audio: Option<Value>,
}

impl ChunkDelta {
    /// Transcript fragment from `audio.transcript`, if present and non-empty.
    pub fn transcript(&self) -> Option<&str> {
        self.audio
            .as_ref()?
            .get("transcript")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Text fragment from `content`, if it is a non-empty string.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref()?.as_str().filter(|s| !s.is_empty())
    }

    /// `audio` is set but has no string `transcript` (empty strings are fine).
    pub(crate) fn has_unreadable_audio(&self) -> bool {
        match &self.audio {
            Some(Value::Object(audio)) => !matches!(audio.get("transcript"), Some(Value::String(_))),
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    /// `content` is set but is not a string.
    pub(crate) fn has_unreadable_content(&self) -> bool {
        !matches!(&self.content, None | Some(Value::Null) | Some(Value::String(_)))
    }
}

/// Token accounting reported at the end of the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_tokens: u64,
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_usage<'de, D>(deserializer: D) -> Result<Option<Usage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

// =============================================================================
// Error Types
// =============================================================================

/// OpenAI-style API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIError {
    pub message: String,

    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    #[serde(default)]
    pub code: Option<Value>,
}

impl std::fmt::Display for OpenAIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            Some(kind) => write!(f, "{} ({})", self.message, kind),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for OpenAIError {}
