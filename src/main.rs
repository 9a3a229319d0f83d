//! Voice Clipper - speak the words between two markers of a transcribed
//! WAV file.
//!
//! The program transcribes a local WAV file with Whisper, asks for a start
//! word and an end word, extracts the token range between them, and speaks
//! the joined phrase aloud with Kokoro TTS.

mod audio;
mod config;
mod console;
mod extract;
mod pipeline;
mod stt;
mod tts;

use std::io;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use audio::Player;
use config::AppConfig;
use pipeline::Markers;
use stt::Transcriber;
use tts::{Speaker, Synthesizer};

fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🔊 Voice Clipper v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        error!("Run 'scripts/setup.sh' to download required models.");
        std::process::exit(1);
    }

    config.log_config();

    // Load the audio file and bring it to the recognizer rate
    let audio_path = config.audio_file.as_ref().context("No audio file specified")?;
    let (file_samples, file_rate) = audio::load_mono(audio_path)?;
    let samples = if file_rate != config.sample_rate {
        info!("Resampling {} Hz -> {} Hz for recognition", file_rate, config.sample_rate);
        audio::resampler::resample(&file_samples, file_rate, config.sample_rate)?
    } else {
        file_samples
    };

    // Create components up front so model errors surface before any prompt
    let mut transcriber = Transcriber::new(&config)?;
    let synthesizer = Synthesizer::new(&config)?;
    let player = Player::new(synthesizer.sample_rate())?;
    let mut speaker = Speaker::new(synthesizer, player);

    let report = pipeline::run(&mut transcriber, &mut speaker, &samples, || resolve_markers(&config))?;

    if report.phrase.is_empty() {
        info!("✅ Done (nothing spoken)");
    } else {
        info!("✅ Done ({} tokens spoken)", report.extracted.len());
    }
    Ok(())
}

/// Resolve the start and end markers: CLI arguments win, otherwise prompt
/// interactively on stdin.
fn resolve_markers(config: &AppConfig) -> Result<Markers> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let start = match config.start_word {
        Some(ref word) => word.clone(),
        None => console::prompt_marker("Enter the word to be searched: ", &mut input, &mut output)?,
    };

    let end = match config.end_word {
        Some(ref word) => word.clone(),
        None => console::prompt_marker("Enter the word till you want to listen: ", &mut input, &mut output)?,
    };

    Ok(Markers { start, end, start_match: config.start_match, end_match: config.end_match })
}
