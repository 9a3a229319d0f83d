//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::MatchPolicy;

use super::voices;

/// Hardware acceleration provider for ONNX models.
/// Auto-detected based on platform if not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// CPU inference (default fallback, always available)
    #[default]
    Cpu,
    /// NVIDIA CUDA acceleration (Linux only, requires CUDA toolkit)
    Cuda,
    /// Apple CoreML acceleration (macOS only, uses Neural Engine)
    #[value(name = "coreml")]
    CoreMl,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Cpu => write!(f, "cpu"),
            Provider::Cuda => write!(f, "cuda"),
            Provider::CoreMl => write!(f, "coreml"),
        }
    }
}

impl Provider {
    /// Convert to sherpa-rs provider string.
    pub fn as_sherpa_provider(&self) -> &'static str {
        match self {
            Provider::Cpu => "cpu",
            Provider::Cuda => "cuda",
            Provider::CoreMl => "coreml",
        }
    }
}

/// Configuration for transcribing a WAV file and speaking an extracted phrase.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "voice-clipper")]
#[command(author, version, about = "Transcribe a WAV file, extract the words between two markers, and speak them", long_about = None)]
pub struct AppConfig {
    /// List all available TTS voices and exit
    #[arg(long)]
    pub list_voices: bool,

    /// Show detailed information about a specific voice and exit
    #[arg(long)]
    pub voice_info: Option<String>,

    /// Path to the WAV file to transcribe
    #[arg(value_name = "AUDIO_FILE", required_unless_present_any = ["list_voices", "voice_info"])]
    pub audio_file: Option<PathBuf>,

    /// Start marker: the first word of the phrase to extract (prompted interactively if omitted)
    #[arg(long, short = 's')]
    pub start_word: Option<String>,

    /// End marker: the last word of the phrase to extract (prompted interactively if omitted)
    #[arg(long, short = 'e')]
    pub end_word: Option<String>,

    /// Which occurrence of the start marker wins when it appears more than once
    #[arg(long, value_enum, default_value = "last")]
    pub start_match: MatchPolicy,

    /// Which occurrence of the end marker wins when it appears more than once
    #[arg(long, value_enum, default_value = "last")]
    pub end_match: MatchPolicy,

    /// Directory containing model files (Whisper, TTS)
    #[arg(long, short = 'd', env = "MODEL_DIR", default_value_os_t = default_model_dir())]
    pub model_dir: PathBuf,

    /// Audio sample rate expected by the speech recognizer
    #[arg(long, default_value = "16000")]
    pub sample_rate: u32,

    /// Text-to-speech speed multiplier (0.9-0.95 for more natural, expressive speech)
    #[arg(long, default_value = "0.93")]
    pub tts_speed: f32,

    /// TTS voice name for Kokoro (e.g., af_bella for high-quality American female).
    /// See <https://huggingface.co/hexgrad/Kokoro-82M/blob/main/VOICES.md>
    #[arg(long, default_value = "af_bella")]
    pub tts_voice: String,

    /// TTS speaker ID override (resolved automatically from --tts-voice when omitted)
    #[arg(long)]
    pub tts_speaker_id: Option<i32>,

    /// STT language code (e.g., en, es, fr, de, it, pt, zh, ja, ko, ru)
    /// Use "auto" for automatic language detection
    #[arg(long, default_value = "en")]
    pub stt_language: String,

    /// Hardware acceleration provider (auto-detected if not specified)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Provider for STT (overrides --provider for speech recognition)
    #[arg(long, value_enum)]
    pub stt_provider: Option<Provider>,

    /// Provider for TTS (overrides --provider for speech synthesis)
    #[arg(long, value_enum)]
    pub tts_provider: Option<Provider>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Number of threads for all models (0 = auto-detect based on CPU cores)
    #[arg(long, default_value = "0")]
    pub num_threads: usize,

    /// STT threads (0 = use num_threads)
    #[arg(long, default_value = "0")]
    pub stt_threads: usize,

    /// TTS threads (0 = use num_threads)
    #[arg(long, default_value = "0")]
    pub tts_threads: usize,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        let mut config = Self::parse();

        // Handle voice listing commands
        if config.list_voices {
            voices::print_voices();
            std::process::exit(0);
        }

        if let Some(ref voice_name) = config.voice_info {
            match voices::print_voice_info(voice_name) {
                Ok(_) => std::process::exit(0),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        config.normalize_thread_counts();
        config
    }

    /// Auto-detect and normalize thread counts based on CPU cores and provider.
    ///
    /// When using CUDA, fewer threads (typically 1) should be used because the
    /// GPU handles parallelism internally; multiple CPU threads with GPU
    /// inference can cause resource contention and CUDA allocation failures.
    fn normalize_thread_counts(&mut self) {
        let cpu_cores = num_cpus::get();
        let using_cuda = self.effective_stt_provider() == Provider::Cuda || self.effective_tts_provider() == Provider::Cuda;

        if self.num_threads == 0 {
            if using_cuda {
                self.num_threads = 1;
            } else {
                // cores/3 leaves headroom and prevents oversubscription when
                // Whisper and Kokoro load in the same process
                self.num_threads = (cpu_cores / 3).max(1);
            }
        }

        if self.stt_threads == 0 {
            self.stt_threads = if self.effective_stt_provider() == Provider::Cuda { 1 } else { self.num_threads };
        }

        if self.tts_threads == 0 {
            self.tts_threads = if self.effective_tts_provider() == Provider::Cuda { 1 } else { self.num_threads };
        }

        if self.verbose {
            info!(
                "CPU cores: {}, Provider: STT={}, TTS={}, Thread counts: STT={}, TTS={}",
                cpu_cores,
                self.effective_stt_provider(),
                self.effective_tts_provider(),
                self.stt_threads,
                self.tts_threads
            );
        }
    }

    /// Get the effective STT provider.
    pub fn effective_stt_provider(&self) -> Provider {
        self.stt_provider.or(self.provider).unwrap_or_else(detect_provider)
    }

    /// Get the effective TTS provider.
    pub fn effective_tts_provider(&self) -> Provider {
        self.tts_provider.or(self.provider).unwrap_or_else(detect_provider)
    }

    /// Resolve the Kokoro speaker ID: explicit override first, then the voice
    /// table, then the af_bella default.
    pub fn effective_speaker_id(&self) -> i32 {
        self.tts_speaker_id.or_else(|| voices::get_voice(&self.tts_voice).map(|v| v.speaker_id)).unwrap_or(2)
    }

    /// Get the path to the Whisper encoder model (multilingual).
    pub fn whisper_encoder_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-encoder.int8.onnx")
    }

    /// Get the path to the Whisper decoder model (multilingual).
    pub fn whisper_decoder_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-decoder.int8.onnx")
    }

    /// Get the path to the Whisper tokens file (multilingual).
    pub fn whisper_tokens_path(&self) -> PathBuf {
        self.model_dir.join("whisper").join("whisper-small-tokens.txt")
    }

    /// Get the effective STT language code for Whisper.
    /// Returns empty string for auto-detection, otherwise the language code.
    pub fn effective_stt_language(&self) -> &str {
        if self.stt_language.eq_ignore_ascii_case("auto") {
            "" // Empty string triggers auto-detection in Whisper
        } else {
            &self.stt_language
        }
    }

    /// Get the path to the Kokoro TTS model (multi-lang v1.0 - supports CoreML).
    pub fn tts_model_path(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0").join("model.onnx")
    }

    /// Get the path to the Kokoro TTS voices.bin file.
    pub fn tts_voices_path(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0").join("voices.bin")
    }

    /// Get the path to the TTS tokens file.
    pub fn tts_tokens_path(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0").join("tokens.txt")
    }

    /// Get the path to the TTS data directory.
    pub fn tts_data_dir(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0").join("espeak-ng-data")
    }

    /// Get the path to the TTS dict directory (for Chinese segmentation).
    pub fn tts_dict_dir(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0").join("dict")
    }

    /// Get the lexicon file path for Kokoro TTS based on voice name.
    /// The model includes lexicon-us-en.txt (American), lexicon-gb-en.txt (British), lexicon-zh.txt (Chinese).
    /// For English/Chinese, use lexicon files. For other languages, return empty (use lang instead).
    pub fn tts_lexicon(&self) -> String {
        let tts_dir = self.model_dir.join("tts").join("kokoro-multi-lang-v1_0");
        if self.tts_voice.len() >= 2 {
            match &self.tts_voice[..2] {
                "af" | "am" => tts_dir.join("lexicon-us-en.txt").to_string_lossy().to_string(),
                "bf" | "bm" => tts_dir.join("lexicon-gb-en.txt").to_string_lossy().to_string(),
                "zf" | "zm" => {
                    // Chinese with English fallback
                    format!("{},{}", tts_dir.join("lexicon-us-en.txt").to_string_lossy(), tts_dir.join("lexicon-zh.txt").to_string_lossy())
                }
                _ => String::new(), // Other languages use lang parameter
            }
        } else {
            tts_dir.join("lexicon-us-en.txt").to_string_lossy().to_string() // Default
        }
    }

    /// Get the language code for non-English voices that need espeak-ng.
    /// For English/Chinese, lexicon files are used instead.
    pub fn tts_language(&self) -> &str {
        if self.tts_voice.len() >= 2 {
            match &self.tts_voice[..2] {
                "ef" | "em" => "es",    // Spanish
                "ff" => "fr",           // French
                "hf" | "hm" => "hi",    // Hindi
                "if" | "im" => "it",    // Italian
                "jf" | "jm" => "ja",    // Japanese
                "pf" | "pm" => "pt-br", // Portuguese BR
                _ => "",                // English/Chinese use lexicon files
            }
        } else {
            "" // Default (use lexicon)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        match self.audio_file {
            Some(ref path) if !path.exists() => {
                anyhow::bail!("Audio file does not exist: {}", path.display());
            }
            None => anyhow::bail!("No audio file specified"),
            _ => {}
        }

        // Check model directory exists
        if !self.model_dir.exists() {
            anyhow::bail!("Model directory does not exist: {}", self.model_dir.display());
        }

        // Check required model files
        let required_files = [
            self.whisper_encoder_path(),
            self.whisper_decoder_path(),
            self.whisper_tokens_path(),
            self.tts_model_path(),
            self.tts_voices_path(),
            self.tts_tokens_path(),
        ];

        for path in &required_files {
            if !path.exists() {
                anyhow::bail!("Required model file not found: {}", path.display());
            }
        }

        if self.tts_speaker_id.is_none() && voices::get_voice(&self.tts_voice).is_none() {
            anyhow::bail!("Unknown TTS voice '{}'. Run with --list-voices to see available voices", self.tts_voice);
        }

        if self.tts_speed <= 0.0 {
            anyhow::bail!("TTS speed must be positive");
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        if let Some(ref path) = self.audio_file {
            info!("  Audio file: {}", path.display());
        }
        info!("  Model directory: {}", self.model_dir.display());
        info!("  Sample rate: {} Hz", self.sample_rate);
        info!("  Start marker match: {}", self.start_match);
        info!("  End marker match: {}", self.end_match);
        info!("  TTS voice: {} (speaker ID: {})", self.tts_voice, self.effective_speaker_id());
        info!("  TTS speed: {}", self.tts_speed);
        info!("  STT language: {}", self.stt_language);
        info!("  STT provider: {}", self.effective_stt_provider());
        info!("  TTS provider: {}", self.effective_tts_provider());
    }
}

/// Get the default model directory (~/.voice-clipper/models).
fn default_model_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".voice-clipper").join("models")
    } else {
        PathBuf::from("models")
    }
}

/// Auto-detect the best hardware acceleration provider.
fn detect_provider() -> Provider {
    #[cfg(target_os = "macos")]
    {
        info!("Detected macOS, using CoreML provider");
        Provider::CoreMl
    }

    #[cfg(target_os = "linux")]
    {
        if has_nvidia_gpu() {
            info!("Detected NVIDIA GPU, using CUDA provider");
            Provider::Cuda
        } else {
            info!("No GPU detected, using CPU provider");
            Provider::Cpu
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        info!("Using CPU provider");
        Provider::Cpu
    }
}

/// Check if an NVIDIA GPU is available (Linux only).
#[cfg(target_os = "linux")]
fn has_nvidia_gpu() -> bool {
    use std::path::Path;

    // Check for NVIDIA device files
    let nvidia_paths = [
        "/dev/nvidia0",
        "/dev/nvidiactl",
        "/dev/nvidia-uvm",
        // Jetson devices
        "/dev/nvhost-ctrl",
        "/dev/nvhost-ctrl-gpu",
    ];

    for path in &nvidia_paths {
        if Path::new(path).exists() {
            return true;
        }
    }

    // Check for Tegra (Jetson) devices
    if Path::new("/etc/nv_tegra_release").exists() {
        return true;
    }

    false
}
