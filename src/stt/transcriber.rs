//! Offline Whisper transcription of a complete audio buffer.

use sherpa_rs::whisper::{WhisperConfig, WhisperRecognizer};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AppConfig;

use super::Transcribe;

/// Failures at the transcription provider boundary.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The recognizer could not be constructed (missing or invalid models).
    #[error("failed to initialize speech recognizer: {0}")]
    Init(String),
    /// The audio produced no words at all.
    #[error("audio produced no intelligible transcript")]
    Unintelligible,
}

/// Whisper-based transcriber for a complete, already-loaded audio buffer.
pub struct Transcriber {
    whisper: WhisperRecognizer,
    sample_rate: u32,
}

impl Transcriber {
    /// Create a new transcriber.
    ///
    /// # Errors
    /// Returns [`RecognitionError::Init`] if Whisper initialization fails,
    /// e.g. when model files are missing or invalid.
    pub fn new(config: &AppConfig) -> Result<Self, RecognitionError> {
        let provider = config.effective_stt_provider();

        info!("Initializing Whisper recognizer with {} provider", provider);

        let stt_language = config.effective_stt_language().to_string();
        debug!("STT language: {}", if stt_language.is_empty() { "auto" } else { &stt_language });

        let whisper_config = WhisperConfig {
            encoder: config.whisper_encoder_path().to_string_lossy().to_string(),
            decoder: config.whisper_decoder_path().to_string_lossy().to_string(),
            tokens: config.whisper_tokens_path().to_string_lossy().to_string(),
            language: stt_language,
            provider: Some(provider.as_sherpa_provider().to_string()),
            num_threads: Some(config.stt_threads.try_into().unwrap_or(2)),
            debug: config.verbose,
            ..Default::default()
        };

        let whisper = WhisperRecognizer::new(whisper_config).map_err(|e| RecognitionError::Init(e.to_string()))?;

        info!("Whisper recognizer initialized successfully");

        Ok(Self { whisper, sample_rate: config.sample_rate })
    }
}

impl Transcribe for Transcriber {
    /// Transcribe the whole buffer at once.
    ///
    /// # Errors
    /// Returns [`RecognitionError::Unintelligible`] when Whisper produces no
    /// text, so the caller never proceeds with an empty transcript.
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, RecognitionError> {
        if samples.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }

        debug!("Transcribing {} samples at {} Hz", samples.len(), self.sample_rate);

        let result = self.whisper.transcribe(self.sample_rate, samples);
        let text = result.text.trim().to_string();

        if text.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }

        info!("Transcript: \"{}\"", text);
        Ok(text)
    }
}
