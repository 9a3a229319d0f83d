//! WAV file loading via hound.

use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use tracing::{debug, info};

/// Load a WAV file as mono f32 samples in [-1.0, 1.0].
///
/// Integer PCM (8/16/24/32-bit) and 32-bit float formats are supported.
/// Multi-channel audio is downmixed by averaging channels.
///
/// # Returns
/// The samples and the file's native sample rate.
pub fn load_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path).with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    debug!("WAV format: {} Hz, {} channels, {} bits, {:?}", spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format);

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>().context("Failed to read float samples")?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .context("Failed to read integer samples")?
        }
    };

    let mono = downmix_to_mono(&samples, spec.channels as usize);

    info!("Loaded {} ({:.2}s at {} Hz)", path.display(), mono.len() as f32 / spec.sample_rate as f32, spec.sample_rate);

    Ok((mono, spec.sample_rate))
}

/// Downmix interleaved samples to mono by averaging channels.
fn downmix_to_mono(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        data.to_vec()
    } else {
        data.chunks(channels).map(|frame| frame.iter().sum::<f32>() / channels as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavSpec;

    #[test]
    fn test_downmix_stereo() {
        let data = vec![0.5f32, 1.0, -0.5, -1.0];
        let result = downmix_to_mono(&data, 2);
        assert_eq!(result, vec![0.75, -0.75]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let data = vec![0.1f32, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&data, 1), data);
    }

    #[test]
    fn test_load_mono_int16_roundtrip() {
        let path = std::env::temp_dir().join("voice-clipper-wav-test-i16.wav");
        let spec = WavSpec { channels: 1, sample_rate: 16000, bits_per_sample: 16, sample_format: SampleFormat::Int };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for v in [0i16, i16::MAX, i16::MIN, 1638] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let (samples, rate) = load_mono(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rate, 16000);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 1.0).abs() < 1e-3);
        assert_eq!(samples[2], -1.0);
        assert!((samples[3] - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_load_mono_downmixes_stereo_file() {
        let path = std::env::temp_dir().join("voice-clipper-wav-test-stereo.wav");
        let spec = WavSpec { channels: 2, sample_rate: 8000, bits_per_sample: 32, sample_format: SampleFormat::Float };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for v in [0.5f32, 1.0, -0.5, -1.0] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let (samples, rate) = load_mono(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rate, 8000);
        assert_eq!(samples, vec![0.75, -0.75]);
    }
}
