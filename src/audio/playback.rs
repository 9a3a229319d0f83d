//! Blocking audio playback through the default output device.
//!
//! Samples are queued into a lock-free ring buffer consumed by the cpal
//! audio callback; `play` blocks on a condvar until the buffer drains.
//! Resampling is applied automatically when the device rate differs from
//! the input rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex as StdMutex};
use std::time::Duration;

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfig, SupportedStreamConfigRange};
use parking_lot::Mutex;
use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use tracing::{debug, info, warn};

use super::resampler::resample;

/// Size of the playback ring buffer in samples (~11 seconds at 48kHz).
const PLAYBACK_RING_SIZE: usize = 524288;

/// Audio player that outputs samples to the speaker and blocks until done.
pub struct Player {
    /// Kept alive to maintain the audio stream
    _stream: Stream,
    /// Sample rate of the audio device
    device_sample_rate: u32,
    /// Sample rate of the input audio (TTS output)
    input_sample_rate: u32,
    /// Ring buffer producer for queuing samples
    producer: Mutex<ringbuf::HeapProd<f32>>,
    /// True while queued samples are still draining
    playing: Arc<AtomicBool>,
    /// Mutex and Condvar for waiting on playback completion
    playing_mutex: Arc<StdMutex<()>>,
    playback_complete: Arc<Condvar>,
}

impl Player {
    /// Create a new audio player on the default output device.
    ///
    /// # Arguments
    /// * `sample_rate` - The sample rate of the audio to be played (24000 for Kokoro)
    ///
    /// # Errors
    /// Returns an error if no output device is available or the output
    /// stream cannot be built.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().context("No output device available")?;

        info!("Using output device: {}", device_name(&device));

        // Prefer the device's default rate for compatibility
        let device_sample_rate = match device.default_output_config() {
            Ok(default_config) => default_config.sample_rate(),
            Err(_) => {
                let supported_configs = device.supported_output_configs().context("Failed to get supported output configs")?;
                find_best_config(supported_configs, 48000)?.sample_rate()
            }
        };

        let supported_configs = device.supported_output_configs().context("Failed to get supported output configs")?;
        let config = find_best_config(supported_configs, device_sample_rate)?;

        if device_sample_rate != sample_rate {
            info!("Device sample rate {} Hz differs from input {} Hz - resampling will be applied", device_sample_rate, sample_rate);
        }

        debug!("Audio playback config: {} Hz, {} channels, {:?}", device_sample_rate, config.channels(), config.sample_format());

        let ring = HeapRb::<f32>::new(PLAYBACK_RING_SIZE);
        let (producer, mut consumer) = ring.split();

        let playing = Arc::new(AtomicBool::new(false));
        let playing_mutex = Arc::new(StdMutex::new(()));
        let playback_complete = Arc::new(Condvar::new());

        let playing_clone = playing.clone();
        let playing_mutex_clone = playing_mutex.clone();
        let playback_complete_clone = playback_complete.clone();

        let channels = config.channels() as usize;
        let stream_config: StreamConfig = config.config();

        let err_fn = |err| {
            tracing::error!("Audio playback error: {}", err);
        };

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    // Lock-free pop; silence once the queue is empty
                    let sample = consumer.try_pop().unwrap_or(0.0);

                    // Duplicate mono sample to all channels
                    for channel in frame.iter_mut() {
                        *channel = sample;
                    }
                }

                if consumer.is_empty() {
                    playing_clone.store(false, Ordering::SeqCst);
                    let _guard = playing_mutex_clone.lock().unwrap();
                    playback_complete_clone.notify_all();
                }
            },
            err_fn,
            None,
        )?;

        stream.play().context("Failed to start playback stream")?;

        info!("Audio playback configured: input {} Hz -> device {} Hz", sample_rate, device_sample_rate);

        Ok(Self {
            _stream: stream,
            device_sample_rate,
            input_sample_rate: sample_rate,
            producer: Mutex::new(producer),
            playing,
            playing_mutex,
            playback_complete,
        })
    }

    /// Play audio samples, blocking until the buffer drains.
    ///
    /// # Arguments
    /// * `samples` - Mono f32 samples at the input sample rate
    ///
    /// # Errors
    /// Returns an error if playback does not complete within the expected
    /// duration plus a one-second margin.
    pub fn play(&self, samples: &[f32]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        // Resample to the device rate if needed
        let samples_to_play = if self.device_sample_rate != self.input_sample_rate {
            let resampled = resample(samples, self.input_sample_rate, self.device_sample_rate)?;
            debug!(
                "Resampled {} -> {} samples ({} Hz -> {} Hz)",
                samples.len(),
                resampled.len(),
                self.input_sample_rate,
                self.device_sample_rate
            );
            resampled
        } else {
            samples.to_vec()
        };

        {
            let mut producer = self.producer.lock();
            let written = producer.push_slice(&samples_to_play);
            if written < samples_to_play.len() {
                warn!("Playback buffer overflow, dropped {} samples", samples_to_play.len() - written);
            }
        }

        self.playing.store(true, Ordering::SeqCst);

        debug!("Playing {} samples at {} Hz", samples_to_play.len(), self.device_sample_rate);

        let duration_secs = samples_to_play.len() as f64 / self.device_sample_rate as f64;
        let deadline = std::time::Instant::now() + Duration::from_secs_f64(duration_secs + 1.0);

        // Wait on the condvar rather than busy-polling
        while self.playing.load(Ordering::Relaxed) {
            if std::time::Instant::now() > deadline {
                anyhow::bail!("Playback did not complete within {:.1}s", duration_secs + 1.0);
            }

            let guard = self.playing_mutex.lock().unwrap();
            let (_guard, _timeout_result) = self.playback_complete.wait_timeout(guard, Duration::from_millis(50)).unwrap();
        }

        debug!("Playback completed");
        Ok(())
    }
}

/// Get a human-readable device name.
fn device_name(device: &Device) -> String {
    device.description().ok().map(|desc| desc.name().to_string()).unwrap_or_else(|| "Unknown".to_string())
}

/// Find the best matching output configuration: mono or stereo, F32 format,
/// at or near the target sample rate.
fn find_best_config(configs: impl Iterator<Item = SupportedStreamConfigRange>, target_sample_rate: u32) -> Result<SupportedStreamConfig> {
    let f32_configs: Vec<SupportedStreamConfigRange> =
        configs.filter(|c| c.channels() <= 2 && c.sample_format() == SampleFormat::F32).collect();

    if f32_configs.is_empty() {
        anyhow::bail!("No F32 audio configuration found - this is unexpected on modern hardware");
    }

    // Prefer a config that supports the target rate exactly
    for config in &f32_configs {
        if target_sample_rate >= config.min_sample_rate() && target_sample_rate <= config.max_sample_rate() {
            return Ok((*config).with_sample_rate(target_sample_rate));
        }
    }

    // Otherwise clamp to the first config's supported range
    let config = &f32_configs[0];
    let rate = if target_sample_rate < config.min_sample_rate() {
        config.min_sample_rate()
    } else {
        config.max_sample_rate()
    };
    Ok((*config).with_sample_rate(rate))
}
