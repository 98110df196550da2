//! Audio source classification and payload encoding.
//!
//! A source string is either a remote URL, which is handed to the provider
//! as-is, or a local path whose bytes are inlined as a base64 data URI.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::base::{RecognitionError, RecognitionResult};
use super::messages::EncodedAudioPayload;

/// Prefix of an inline payload. The MIME type is intentionally left empty.
pub const DATA_URI_PREFIX: &str = "data:;base64,";

/// Where the audio to recognize lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Remote `http://` or `https://` URL.
    Url(String),
    /// Path on the local filesystem.
    Local(PathBuf),
}

impl AudioSource {
    /// Classify a source string by its scheme prefix.
    pub fn classify(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Local(PathBuf::from(source))
        }
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Local(_) => "local",
        }
    }

    /// Extension reported as the payload `format`.
    ///
    /// URL extensions are lowercased, local ones keep the case they were
    /// given with.
    pub fn format(&self) -> String {
        match self {
            Self::Url(url) => url_extension(url),
            Self::Local(path) => path_extension(path),
        }
    }

    /// Produce the `input_audio` payload for this source.
    ///
    /// Local files are read in full; an unreadable file surfaces as
    /// [`RecognitionError::AudioSourceError`].
    pub async fn encode(&self) -> RecognitionResult<EncodedAudioPayload> {
        let data = match self {
            Self::Url(url) => url.clone(),
            Self::Local(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| {
                    RecognitionError::AudioSourceError {
                        path: path.clone(),
                        source,
                    }
                })?;
                debug!("Encoding {} bytes from {}", bytes.len(), path.display());
                encode_data_uri(&bytes)
            }
        };

        Ok(EncodedAudioPayload {
            data,
            format: self.format(),
        })
    }
}

/// Wrap raw bytes as `data:;base64,<...>`.
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + encoded.len());
    uri.push_str(DATA_URI_PREFIX);
    uri.push_str(&encoded);
    uri
}

/// Lowercased extension (with leading dot) of a URL's path component.
///
/// Query string and fragment never contribute. Returns an empty string when
/// the last path segment has no extension or the path ends in `/`.
pub fn url_extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => {
            // Strip scheme, authority, query and fragment by hand.
            let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
            let end = without_scheme
                .find(['?', '#'])
                .unwrap_or(without_scheme.len());
            let rest = &without_scheme[..end];
            rest.find('/').map_or("", |i| &rest[i..]).to_string()
        }
    };
    // `Path` drops a trailing separator, so `clip.mp3/` would still match.
    if path.ends_with('/') {
        return String::new();
    }
    path_extension(Path::new(&path)).to_lowercase()
}

/// Extension (with leading dot) of a filesystem path, case preserved.
pub fn path_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
