//! Speech-to-text module using sherpa-rs.
//!
//! Provides offline Whisper transcription behind the [`Transcribe`]
//! capability trait so the pipeline can run against a fake in tests.

mod transcriber;

pub use transcriber::{RecognitionError, Transcriber};

/// Capability: convert an audio buffer into a transcript.
pub trait Transcribe {
    /// Transcribe mono f32 samples at the provider's expected sample rate.
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, RecognitionError>;
}
