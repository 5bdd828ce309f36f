use std::collections::VecDeque;

use serde::Serialize;

use super::event::{RunEventKind, TelemetryEvent};
use crate::queue::segment::SegmentStatusKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub run_stats: RunStats,
    pub segment_stats: SegmentStats,
    pub merge_stats: MergeStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub started: u64,
    pub resumed: u64,
    pub stopped: u64,
    pub abandoned: u64,
    pub finished: u64,
    pub cleared: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentStats {
    pub completed: u64,
    pub failed: u64,
    pub total_latency_ms: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeStats {
    pub merges: u64,
    pub last_segments: usize,
    pub last_pcm_bytes: usize,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::RunLifecycle { event, .. } => match event {
                RunEventKind::Started { .. } => snap.run_stats.started += 1,
                RunEventKind::Resumed { .. } => snap.run_stats.resumed += 1,
                RunEventKind::Stopped => snap.run_stats.stopped += 1,
                RunEventKind::Abandoned { .. } => snap.run_stats.abandoned += 1,
                RunEventKind::Finished => snap.run_stats.finished += 1,
                RunEventKind::Cleared => snap.run_stats.cleared += 1,
            },
            TelemetryEvent::SegmentSettled { outcome, latency_ms, .. } => {
                match outcome {
                    SegmentStatusKind::Completed => snap.segment_stats.completed += 1,
                    SegmentStatusKind::Error => snap.segment_stats.failed += 1,
                    _ => continue,
                }
                let stats = &mut snap.segment_stats;
                stats.total_latency_ms += latency_ms;
                stats.max_latency_ms = stats.max_latency_ms.max(*latency_ms);
            }
            TelemetryEvent::Merge { segments, pcm_bytes } => {
                snap.merge_stats.merges += 1;
                snap.merge_stats.last_segments = *segments;
                snap.merge_stats.last_pcm_bytes = *pcm_bytes;
            }
        }
    }

    let settled = snap.segment_stats.completed + snap.segment_stats.failed;
    if settled > 0 {
        snap.segment_stats.avg_latency_ms =
            snap.segment_stats.total_latency_ms as f64 / settled as f64;
    }

    snap
}
