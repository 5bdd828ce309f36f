#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::{mpsc, Semaphore};
use voxline::{PipelineError, Result, Synthesizer};

/// Deterministic backend:
/// - text containing `FAIL` -> synthesis error
/// - text containing `BADB64` -> payload that is not base64
/// - anything else -> `bytes_per_char * chars` bytes of PCM filled with the segment's first byte
pub struct ScriptedSynthesizer {
    pub bytes_per_char: usize,
    pub delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSynthesizer {
    pub fn new(bytes_per_char: usize) -> Self {
        Self {
            bytes_per_char,
            delay: Duration::from_millis(0),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn pcm_for(&self, text: &str) -> Vec<u8> {
        let fill = text.as_bytes().first().copied().unwrap_or(0);
        vec![fill; text.chars().count() * self.bytes_per_char]
    }
}

#[async_trait]
impl Synthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if text.contains("FAIL") {
            return Err(PipelineError::Synthesis("quota exceeded".into()));
        }
        if text.contains("BADB64") {
            return Ok("!!! not base64 !!!".into());
        }
        Ok(STANDARD.encode(self.pcm_for(text)))
    }
}

/// Backend whose calls block until the test hands out a permit. Announces each
/// call on `started` before blocking, so tests can stage stop/clear precisely.
pub struct GatedSynthesizer {
    gate: Semaphore,
    started: mpsc::UnboundedSender<String>,
    calls: Mutex<Vec<String>>,
}

impl GatedSynthesizer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (started, rx) = mpsc::unbounded_channel();
        (
            Self {
                gate: Semaphore::new(0),
                started,
                calls: Mutex::new(Vec::new()),
            },
            rx,
        )
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for GatedSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        let _ = self.started.send(text.to_string());
        self.gate.acquire().await.unwrap().forget();
        Ok(STANDARD.encode(vec![7u8; 32]))
    }
}

pub fn pcm_container(pcm: &[u8]) -> voxline::WavContainer {
    voxline::WavContainer::from_pcm(pcm, voxline::config::SAMPLE_RATE).unwrap()
}
