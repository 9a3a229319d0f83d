//! The one-shot pipeline: transcript → tokens → extracted range → speech.
//!
//! The speech providers enter through the [`Transcribe`] and [`Speak`]
//! capability traits, so the whole flow runs in tests with in-memory fakes.

use anyhow::Result;
use tracing::{info, warn};

use crate::extract::{self, MatchPolicy};
use crate::stt::Transcribe;
use crate::tts::Speak;

/// The two user-supplied boundary words and their match policies.
#[derive(Debug, Clone)]
pub struct Markers {
    pub start: String,
    pub end: String,
    pub start_match: MatchPolicy,
    pub end_match: MatchPolicy,
}

/// What a pipeline run produced at each stage.
#[derive(Debug)]
pub struct PipelineReport {
    pub transcript: String,
    pub extracted: Vec<String>,
    pub phrase: String,
}

/// Run the pipeline once: transcribe the samples, resolve markers, extract
/// the token range, and speak the joined phrase.
///
/// `resolve_markers` is called after transcription completes, so an
/// interactive resolver prompts the user once the transcript is known.
/// An empty extraction (start marker absent, or resolved after the end
/// marker) is logged and skips speech; a missing end marker is an error.
pub fn run(
    stt: &mut dyn Transcribe,
    voice: &mut dyn Speak,
    samples: &[f32],
    resolve_markers: impl FnOnce() -> Result<Markers>,
) -> Result<PipelineReport> {
    let transcript = stt.transcribe(samples)?;
    let tokens = extract::tokenize(&transcript);
    info!("Transcript has {} tokens", tokens.len());

    let markers = resolve_markers()?;

    let extracted = extract::extract_range(&tokens, &markers.start, &markers.end, markers.start_match, markers.end_match)?.to_vec();
    info!("Extracted tokens: {:?}", extracted);

    let phrase = extract::join_phrase(&extracted);

    if phrase.is_empty() {
        warn!("Start marker \"{}\" not found before the end marker; nothing to speak", markers.start);
    } else {
        voice.speak(&phrase)?;
    }

    Ok(PipelineReport { transcript, extracted, phrase })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::RecognitionError;

    struct FakeTranscriber(&'static str);

    impl Transcribe for FakeTranscriber {
        fn transcribe(&mut self, _samples: &[f32]) -> Result<String, RecognitionError> {
            Ok(self.0.to_string())
        }
    }

    struct FakeSpeaker {
        spoken: Vec<String>,
    }

    impl Speak for FakeSpeaker {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.spoken.push(text.to_string());
            Ok(())
        }
    }

    fn markers(start: &str, end: &str) -> Markers {
        Markers { start: start.to_string(), end: end.to_string(), start_match: MatchPolicy::Last, end_match: MatchPolicy::Last }
    }

    #[test]
    fn test_run_speaks_joined_phrase() {
        let mut stt = FakeTranscriber("the cat sat on the mat");
        let mut voice = FakeSpeaker { spoken: Vec::new() };

        let report = run(&mut stt, &mut voice, &[0.0], || Ok(markers("cat", "the"))).unwrap();

        assert_eq!(report.extracted, vec!["cat", "sat", "on", "the"]);
        assert_eq!(report.phrase, "catsatonthe");
        assert_eq!(voice.spoken, vec!["catsatonthe"]);
    }

    #[test]
    fn test_run_skips_speech_when_start_marker_absent() {
        let mut stt = FakeTranscriber("the cat sat");
        let mut voice = FakeSpeaker { spoken: Vec::new() };

        let report = run(&mut stt, &mut voice, &[0.0], || Ok(markers("dog", "sat"))).unwrap();

        assert!(report.extracted.is_empty());
        assert!(report.phrase.is_empty());
        assert!(voice.spoken.is_empty());
    }

    #[test]
    fn test_run_fails_when_end_marker_absent() {
        let mut stt = FakeTranscriber("the cat sat");
        let mut voice = FakeSpeaker { spoken: Vec::new() };

        let err = run(&mut stt, &mut voice, &[0.0], || Ok(markers("cat", "dog"))).unwrap_err();

        assert!(err.to_string().contains("end marker"));
        assert!(voice.spoken.is_empty());
    }
}
