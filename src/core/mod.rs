pub mod recognition;

// Re-export commonly used types for convenience
pub use recognition::{
    AudioRecognitionClient, AudioSource, BlockingAudioRecognizer, RecognitionError,
    RecognitionResult,
};
