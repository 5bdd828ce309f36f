pub mod client;
pub mod stub;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpSynthesizer;
pub use stub::SilenceSynthesizer;

/// Remote text-to-speech call. Returns base64-encoded 16-bit mono PCM.
///
/// Treated as opaque by the queue: one attempt per job, no retries.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<String>;
}
