//! Audio I/O: WAV file loading, resampling, and playback.
//!
//! Input audio comes from a WAV file (hound); output goes to the default
//! cpal device, with rubato resampling on both paths when rates differ.

mod playback;
pub mod resampler;
mod wav;

pub use playback::Player;
pub use wav::load_mono;
