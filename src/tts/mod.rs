//! Text-to-speech module using sherpa-rs.
//!
//! Provides Kokoro speech synthesis and blocking playback behind the
//! [`Speak`] capability trait.

mod speaker;
mod synthesizer;

pub use speaker::Speaker;
pub use synthesizer::Synthesizer;

use anyhow::Result;

/// Capability: render a string as audible speech, blocking until playback
/// completes.
pub trait Speak {
    fn speak(&mut self, text: &str) -> Result<()>;
}
