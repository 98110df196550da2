//! Error type shared by the recognition client and its helpers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running an audio recognition request.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to read audio file {}: {source}", path.display())]
    AudioSourceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("Malformed response stream: {0}")]
    StreamError(String),
}

impl RecognitionError {
    /// Whether the remote call itself failed (as opposed to bad config or
    /// an unreadable local file).
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::AuthenticationFailed(_)
                | Self::ProviderError { .. }
                | Self::StreamError(_)
        )
    }
}

pub type RecognitionResult<T> = Result<T, RecognitionError>;
