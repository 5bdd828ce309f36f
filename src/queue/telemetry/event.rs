use serde::{Deserialize, Serialize};

use crate::queue::segment::{SegmentId, SegmentStatusKind};

// Allowed: IDs, Counts, Byte Lengths, Durations, Enums
// Forbidden: Text, PCM, base64

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    RunLifecycle {
        event: RunEventKind,
        version: u64,
    },

    /// A job settled. `latency_ms` covers the synthesis call plus decoding.
    SegmentSettled {
        segment_id: SegmentId,
        index: usize,
        outcome: SegmentStatusKind,
        latency_ms: u64,
    },

    Merge {
        segments: usize,
        pcm_bytes: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEventKind {
    Started { segments: usize },
    Resumed { pending: usize },
    Stopped,
    /// The caller dropped the run mid-job; its in-flight job was requeued.
    Abandoned { requeued: bool },
    Finished,
    Cleared,
}
