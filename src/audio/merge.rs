use std::sync::Arc;

use tracing::debug;

use super::wav::{checked_data_len, WavContainer, BYTES_PER_SAMPLE};
use crate::error::{PipelineError, Result};

/// Number of zero samples in a gap of `silence_seconds`.
pub fn silence_samples(sample_rate: u32, silence_seconds: f64) -> usize {
    (sample_rate as f64 * silence_seconds).floor() as usize
}

/// Concatenates containers in order, with a gap of digital silence strictly
/// between neighbours.
///
/// A single input is handed back as-is. The caller filters out failed segments
/// beforehand; nothing is reordered or dropped here.
pub fn merge(
    containers: &[Arc<WavContainer>],
    sample_rate: u32,
    silence_seconds: f64,
) -> Result<Arc<WavContainer>> {
    match containers {
        [] => Err(PipelineError::NoInput),
        [only] => Ok(Arc::clone(only)),
        _ => {
            // Size everything up front so an impossible gap fails before allocating.
            let too_large = || PipelineError::PayloadTooLarge(usize::MAX);
            let gap_bytes = silence_samples(sample_rate, silence_seconds)
                .checked_mul(BYTES_PER_SAMPLE)
                .ok_or_else(too_large)?;
            let total = containers
                .iter()
                .try_fold(0usize, |acc, c| acc.checked_add(c.pcm().len()))
                .and_then(|payload| gap_bytes.checked_mul(containers.len() - 1)?.checked_add(payload))
                .ok_or_else(too_large)?;
            checked_data_len(total)?;

            let silence = vec![0u8; gap_bytes];
            let mut pcm = Vec::with_capacity(total);

            for (i, container) in containers.iter().enumerate() {
                if i > 0 {
                    pcm.extend_from_slice(&silence);
                }
                pcm.extend_from_slice(container.pcm());
            }

            debug!(
                "Merged {} segments into {} PCM bytes ({} silence bytes per gap)",
                containers.len(),
                pcm.len(),
                silence.len()
            );
            Ok(Arc::new(WavContainer::from_pcm(&pcm, sample_rate)?))
        }
    }
}
