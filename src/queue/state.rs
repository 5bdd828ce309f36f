use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cancel::StopSignal;
use super::segment::{Segment, SegmentId, SegmentStatus, SegmentStatusKind};
use crate::audio::WavContainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Processing,
}

/// Strict state delta. This is the ONLY way queue state mutates.
#[derive(Debug, Clone)]
pub enum QueueDelta {
    /// Replace the job list with freshly segmented jobs and begin a run.
    Loaded(Vec<Segment>),
    /// Begin a run over the existing list.
    Resumed,
    SegmentStarted(SegmentId),
    SegmentCompleted { id: SegmentId, audio: Arc<WavContainer> },
    SegmentFailed { id: SegmentId, detail: String },
    /// Put a job whose result will never arrive back in the queue.
    SegmentRequeued(SegmentId),
    /// Run ended, either finished or stopped.
    Halted,
    Cleared,
}

#[derive(Debug, Default)]
pub struct QueueState {
    segments: Vec<Segment>,
    status: RunStatus,
    /// Monotonic, bumped on every reduction.
    version: u64,
    /// Bumped whenever the job list is replaced or discarded. Results carrying an
    /// older generation belong to a list that no longer exists.
    generation: u64,
    stop: StopSignal,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: QueueDelta) {
        self.version += 1;

        match delta {
            QueueDelta::Loaded(segments) => {
                self.segments = segments;
                self.generation += 1;
                self.status = RunStatus::Processing;
                self.stop = StopSignal::new();
            }
            QueueDelta::Resumed => {
                self.status = RunStatus::Processing;
                self.stop = StopSignal::new();
            }
            QueueDelta::SegmentStarted(id) => {
                self.transition(id, SegmentStatus::Processing);
            }
            QueueDelta::SegmentCompleted { id, audio } => {
                self.transition(id, SegmentStatus::Completed { audio });
            }
            QueueDelta::SegmentFailed { id, detail } => {
                self.transition(id, SegmentStatus::Failed { detail });
            }
            QueueDelta::SegmentRequeued(id) => {
                self.transition(id, SegmentStatus::Pending);
            }
            QueueDelta::Halted => {
                self.status = RunStatus::Idle;
            }
            QueueDelta::Cleared => {
                self.stop.raise();
                self.segments.clear();
                self.generation += 1;
                self.status = RunStatus::Idle;
            }
        }
    }

    fn transition(&mut self, id: SegmentId, next: SegmentStatus) {
        match self.segments.iter_mut().find(|s| s.id == id) {
            Some(segment) => segment.status = next,
            None => warn!("Dropped transition for unknown segment {}", id),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First job still waiting, with its position in the list.
    pub fn next_pending(&self) -> Option<(usize, &Segment)> {
        self.segments.iter().enumerate().find(|(_, s)| s.is_pending())
    }

    pub fn count(&self, kind: SegmentStatusKind) -> usize {
        self.segments.iter().filter(|s| s.status.kind() == kind).count()
    }

    /// Audio of every completed job with its list position, in original segment order.
    pub fn completed_audio(&self) -> Vec<(usize, Arc<WavContainer>)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(index, s)| s.audio().map(|audio| (index, Arc::clone(audio))))
            .collect()
    }

    /// Integer percentage of completed jobs. Derived, never stored.
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.count(SegmentStatusKind::Completed), self.segments.len())
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            status: self.status,
            version: self.version,
            total: self.segments.len(),
            completed: self.count(SegmentStatusKind::Completed),
            failed: self.count(SegmentStatusKind::Error),
            pending: self.count(SegmentStatusKind::Pending),
            progress_percent: self.progress_percent(),
            segments: self
                .segments
                .iter()
                .enumerate()
                .map(|(index, s)| SegmentView {
                    id: s.id,
                    index,
                    chars: s.text.chars().count(),
                    status: s.status.kind(),
                    error: s.error_detail().map(str::to_string),
                })
                .collect(),
        }
    }
}

pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (completed * 100 / total) as u8
}

/// Read-only view published after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub status: RunStatus,
    pub version: u64,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub progress_percent: u8,
    pub segments: Vec<SegmentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentView {
    pub id: SegmentId,
    pub index: usize,
    pub chars: usize,
    pub status: SegmentStatusKind,
    pub error: Option<String>,
}
