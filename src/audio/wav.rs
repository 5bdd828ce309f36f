use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::{BITS_PER_SAMPLE, CHANNELS};
use crate::error::{PipelineError, Result};

pub const HEADER_LEN: usize = 44;
pub const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;
/// Largest payload whose RIFF chunk size (`36 + data_len`) still fits in a u32.
pub const MAX_DATA_LEN: u32 = u32::MAX - 36;

/// Canonical PCM WAV file: 44-byte header followed by 16-bit mono little-endian samples.
///
/// Only constructed through [`WavContainer::from_pcm`] (or its base64 front-end),
/// so the header's data length always equals the payload length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavContainer {
    bytes: Vec<u8>,
}

impl WavContainer {
    /// Wraps raw little-endian 16-bit mono PCM in a WAV header.
    pub fn from_pcm(pcm: &[u8], sample_rate: u32) -> Result<Self> {
        let header = header(checked_data_len(pcm.len())?, sample_rate)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + pcm.len());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(pcm);
        Ok(Self { bytes })
    }

    /// Decodes a base64 PCM payload as returned by the synthesis backend.
    pub fn from_base64_pcm(payload: &str, sample_rate: u32) -> Result<Self> {
        let pcm = STANDARD.decode(payload.trim())?;
        Self::from_pcm(&pcm, sample_rate)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// PCM payload with the header stripped.
    pub fn pcm(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    pub fn data_length(&self) -> u32 {
        read_u32(&self.bytes, 40)
    }

    pub fn sample_rate(&self) -> u32 {
        read_u32(&self.bytes, 24)
    }

    pub fn duration_secs(&self) -> f64 {
        let rate = self.sample_rate();
        if rate == 0 {
            return 0.0;
        }
        (self.pcm().len() / BYTES_PER_SAMPLE) as f64 / rate as f64
    }

    /// `data:` URL that a standard media element can play directly.
    pub fn to_data_url(&self) -> String {
        format!("data:audio/wav;base64,{}", STANDARD.encode(&self.bytes))
    }
}

impl AsRef<[u8]> for WavContainer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Payload length as it goes into the header, rejecting anything over [`MAX_DATA_LEN`].
pub fn checked_data_len(len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&n| n <= MAX_DATA_LEN)
        .ok_or(PipelineError::PayloadTooLarge(len))
}

/// The 44-byte RIFF/WAVE header for `data_len` bytes of mono 16-bit PCM.
pub fn header(data_len: u32, sample_rate: u32) -> Result<[u8; HEADER_LEN]> {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let riff_len = data_len
        .checked_add(36)
        .ok_or(PipelineError::PayloadTooLarge(data_len as usize))?;
    let byte_rate = sample_rate.checked_mul(block_align as u32).ok_or_else(|| {
        PipelineError::Config(format!("sample rate {} overflows the byte rate", sample_rate))
    })?;

    let mut h = [0u8; HEADER_LEN];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&riff_len.to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");

    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    h[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    h[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&block_align.to_le_bytes());
    h[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_len.to_le_bytes());
    Ok(h)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
