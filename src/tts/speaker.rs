//! Speech output: synthesis plus blocking playback.

use anyhow::Result;
use tracing::info;

use crate::audio::Player;

use super::{Speak, Synthesizer};

/// Speech output provider backed by Kokoro TTS and the default audio device.
pub struct Speaker {
    synthesizer: Synthesizer,
    player: Player,
}

impl Speaker {
    pub fn new(synthesizer: Synthesizer, player: Player) -> Self {
        Self { synthesizer, player }
    }
}

impl Speak for Speaker {
    /// Synthesize `text` and play it, blocking until playback completes.
    fn speak(&mut self, text: &str) -> Result<()> {
        let samples = self.synthesizer.synthesize(text)?;
        if samples.is_empty() {
            return Ok(());
        }

        info!("Playing {} samples", samples.len());
        self.player.play(&samples)?;
        Ok(())
    }
}
