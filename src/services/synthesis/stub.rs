use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::Synthesizer;
use crate::audio::wav::BYTES_PER_SAMPLE;
use crate::error::Result;

/// Offline synthesizer: every request yields the same stretch of digital silence.
#[derive(Debug, Clone)]
pub struct SilenceSynthesizer {
    payload: String,
}

impl SilenceSynthesizer {
    pub fn new(samples: usize) -> Self {
        Self {
            payload: STANDARD.encode(vec![0u8; samples * BYTES_PER_SAMPLE]),
        }
    }

    pub fn seconds(sample_rate: u32, seconds: f64) -> Self {
        Self::new((sample_rate as f64 * seconds).floor() as usize)
    }
}

#[async_trait]
impl Synthesizer for SilenceSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<String> {
        Ok(self.payload.clone())
    }
}
