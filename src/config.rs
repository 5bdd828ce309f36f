use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Output sample rate of the synthesis backend, in Hz.
pub const SAMPLE_RATE: u32 = 24_000;
/// Character budget per synthesis segment.
pub const MAX_SEGMENT_CHARS: usize = 4_000;
/// Silence inserted between merged segments.
pub const SILENCE_GAP_SECS: f64 = 0.7;
/// Upper bounds accepted by [`PipelineConfig::validate`].
pub const MAX_SAMPLE_RATE: u32 = 384_000;
pub const MAX_SILENCE_SECS: f64 = 60.0;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_VOICE: &str = "Kore";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Fixed pipeline parameters. Built once per session, never mutated while a run is live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sample_rate: u32,
    pub max_chars: usize,
    pub silence_seconds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            max_chars: MAX_SEGMENT_CHARS,
            silence_seconds: SILENCE_GAP_SECS,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(PipelineError::Config(format!(
                "sample rate must be within 1..={} Hz, got {}",
                MAX_SAMPLE_RATE, self.sample_rate
            )));
        }
        if self.max_chars == 0 {
            return Err(PipelineError::Config("segment budget must be non-zero".into()));
        }
        if !(0.0..=MAX_SILENCE_SECS).contains(&self.silence_seconds) {
            return Err(PipelineError::Config(format!(
                "silence gap must be within 0..={} seconds, got {}",
                MAX_SILENCE_SECS, self.silence_seconds
            )));
        }
        Ok(())
    }
}

/// Connection settings for the remote text-to-speech backend.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub endpoint: String,
    pub model: String,
    pub voice: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl SynthesisConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `GEMINI_API_KEY` plus the optional `VOXLINE_TTS_*` overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PipelineError::Config("GEMINI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(endpoint) = std::env::var("VOXLINE_TTS_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("VOXLINE_TTS_MODEL") {
            config.model = model;
        }
        if let Ok(voice) = std::env::var("VOXLINE_TTS_VOICE") {
            config.voice = voice;
        }
        if let Ok(raw) = std::env::var("VOXLINE_TTS_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| {
                PipelineError::Config(format!("VOXLINE_TTS_TIMEOUT_SECS '{}': {}", raw, e))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}
