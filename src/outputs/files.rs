use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::audio::WavContainer;
use crate::error::Result;
use crate::queue::SegmentQueue;

pub const MERGED_FILE_NAME: &str = "merged_output.wav";

/// `segment_<n>.wav`, numbered from 1 in segment order.
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{}.wav", index + 1)
}

pub async fn write_segment(dir: &Path, index: usize, wav: &WavContainer) -> Result<PathBuf> {
    write_wav(dir, &segment_file_name(index), wav).await
}

pub async fn write_merged(dir: &Path, wav: &WavContainer) -> Result<PathBuf> {
    write_wav(dir, MERGED_FILE_NAME, wav).await
}

/// Writes every completed segment plus the merged track. Failed and pending
/// segments are skipped; their numbers are left as gaps.
///
/// The per-segment files and the merged track come from one read of the list,
/// so a run still in progress cannot make them disagree.
pub async fn deliver_all(dir: &Path, queue: &SegmentQueue) -> Result<Vec<PathBuf>> {
    let delivery = queue.merge_completed().await?;

    let mut written = Vec::with_capacity(delivery.segments.len() + 1);
    for (index, audio) in &delivery.segments {
        written.push(write_segment(dir, *index, audio).await?);
    }
    written.push(write_merged(dir, &delivery.merged).await?);

    info!("Delivered {} files to {}", written.len(), dir.display());
    Ok(written)
}

async fn write_wav(dir: &Path, name: &str, wav: &WavContainer) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    fs::write(&path, wav.as_bytes()).await?;
    Ok(path)
}
