use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::WavContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub Uuid);

impl SegmentId {
    pub fn new() -> Self {
        SegmentId(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Job status. Audio exists only on `Completed`, a reason only on `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentStatus {
    Pending,
    Processing,
    Completed { audio: Arc<WavContainer> },
    Failed { detail: String },
}

impl SegmentStatus {
    pub fn kind(&self) -> SegmentStatusKind {
        match self {
            SegmentStatus::Pending => SegmentStatusKind::Pending,
            SegmentStatus::Processing => SegmentStatusKind::Processing,
            SegmentStatus::Completed { .. } => SegmentStatusKind::Completed,
            SegmentStatus::Failed { .. } => SegmentStatusKind::Error,
        }
    }
}

/// Payload-free status tag, used in snapshots and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatusKind {
    Pending,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: SegmentId,
    pub text: String,
    pub status: SegmentStatus,
}

impl Segment {
    pub fn new(text: String) -> Self {
        Self {
            id: SegmentId::new(),
            text,
            status: SegmentStatus::Pending,
        }
    }

    pub fn audio(&self) -> Option<&Arc<WavContainer>> {
        match &self.status {
            SegmentStatus::Completed { audio } => Some(audio),
            _ => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match &self.status {
            SegmentStatus::Failed { detail } => Some(detail),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, SegmentStatus::Pending)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, SegmentStatus::Completed { .. })
    }
}
