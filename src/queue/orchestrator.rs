use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::cancel::StopSignal;
use super::segment::{Segment, SegmentId, SegmentStatusKind};
use super::state::{QueueDelta, QueueSnapshot, QueueState, RunStatus};
use super::telemetry::{RunEventKind, TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};
use crate::audio::{merge, WavContainer};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::services::synthesis::Synthesizer;
use crate::text::segment;

/// How a drive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// No pending jobs remain.
    Finished,
    /// `stop()` was honoured; remaining jobs stay pending.
    Stopped,
    /// `clear()` discarded the list this run was driving.
    Superseded,
}

/// Merged track together with the completed segments it was built from.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// `(list position, audio)` of every completed segment, in order.
    pub segments: Vec<(usize, Arc<WavContainer>)>,
    pub merged: Arc<WavContainer>,
}

struct Core {
    state: QueueState,
    telemetry: TelemetryRecorder,
    snapshots: watch::Sender<QueueSnapshot>,
}

impl Core {
    fn record_run(&mut self, event: RunEventKind) {
        let version = self.state.version();
        self.telemetry
            .record(TelemetryEvent::RunLifecycle { event, version });
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.state.snapshot());
    }

    /// Halts a run whose drive loop went away without settling.
    fn abandon(&mut self, generation: u64, in_flight: Option<SegmentId>) {
        if self.state.generation() != generation || self.state.status() != RunStatus::Processing {
            return;
        }
        if let Some(id) = in_flight {
            self.state.reduce(QueueDelta::SegmentRequeued(id));
        }
        self.state.reduce(QueueDelta::Halted);
        self.record_run(RunEventKind::Abandoned {
            requeued: in_flight.is_some(),
        });
        self.publish();
        warn!(
            "Synthesis run dropped by its caller: {} segments left pending",
            self.state.count(SegmentStatusKind::Pending)
        );
    }
}

/// Armed for the lifetime of a drive loop. If the caller drops the loop's future
/// early, the in-flight job returns to pending and the run halts, so
/// `continue_run` can pick up where it left off.
struct RunGuard {
    core: Arc<Mutex<Core>>,
    generation: u64,
    in_flight: Option<SegmentId>,
    armed: bool,
}

impl RunGuard {
    fn new(core: Arc<Mutex<Core>>, generation: u64) -> Self {
        Self {
            core,
            generation,
            in_flight: None,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        let in_flight = self.in_flight.take();

        match self.core.try_lock() {
            Ok(mut core) => core.abandon(generation, in_flight),
            // Someone else holds the writer lock; settle as soon as they release it.
            Err(_) => match Handle::try_current() {
                Ok(handle) => {
                    let core = Arc::clone(&self.core);
                    handle.spawn(async move {
                        core.lock().await.abandon(generation, in_flight);
                    });
                }
                Err(_) => warn!("Drive loop dropped outside a runtime; run left processing"),
            },
        }
    }
}

/// Single-writer orchestrator over one session's synthesis jobs.
///
/// Jobs run strictly one at a time, in list order. Readers observe immutable
/// [`QueueSnapshot`]s published after every mutation and never take the writer lock.
pub struct SegmentQueue {
    synthesizer: Arc<dyn Synthesizer>,
    config: PipelineConfig,
    core: Arc<Mutex<Core>>,
    /// Held across each external synthesis call so that at most one is ever in
    /// flight, even when a cleared run is still settling its last job.
    lane: Mutex<()>,
    snapshots: watch::Receiver<QueueSnapshot>,
}

impl SegmentQueue {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let (tx, snapshots) = watch::channel(QueueSnapshot::default());
        Ok(Self {
            synthesizer,
            config,
            core: Arc::new(Mutex::new(Core {
                state: QueueState::new(),
                telemetry: TelemetryRecorder::new(),
                snapshots: tx,
            })),
            lane: Mutex::new(()),
            snapshots,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Segments `text` into a fresh job list and drives it to completion or stop.
    pub async fn start(&self, text: &str) -> Result<RunOutcome> {
        let (generation, stop) = {
            let mut core = self.core.lock().await;
            if core.state.status() == RunStatus::Processing {
                return Err(PipelineError::AlreadyRunning);
            }

            let segments: Vec<Segment> = segment(text, self.config.max_chars)?
                .into_iter()
                .map(Segment::new)
                .collect();
            let count = segments.len();

            core.state.reduce(QueueDelta::Loaded(segments));
            core.record_run(RunEventKind::Started { segments: count });
            core.publish();
            info!("Synthesis run started: {} segments", count);

            (core.state.generation(), core.state.stop_signal().clone())
        };

        Ok(self.drive(generation, stop).await)
    }

    /// Resumes from the first pending job without re-segmenting. Finished work is kept.
    pub async fn continue_run(&self) -> Result<RunOutcome> {
        let (generation, stop) = {
            let mut core = self.core.lock().await;
            if core.state.status() == RunStatus::Processing {
                return Err(PipelineError::AlreadyRunning);
            }
            let pending = core.state.count(SegmentStatusKind::Pending);
            if pending == 0 {
                return Err(PipelineError::NothingToResume);
            }

            core.state.reduce(QueueDelta::Resumed);
            core.record_run(RunEventKind::Resumed { pending });
            core.publish();
            info!("Synthesis run resumed: {} pending segments", pending);

            (core.state.generation(), core.state.stop_signal().clone())
        };

        Ok(self.drive(generation, stop).await)
    }

    /// Asks the running drive loop to halt once the in-flight job settles.
    pub async fn stop(&self) -> Result<()> {
        let core = self.core.lock().await;
        if core.state.status() != RunStatus::Processing {
            return Err(PipelineError::NotRunning);
        }
        core.state.stop_signal().raise();
        info!("Stop requested; in-flight segment will settle first");
        Ok(())
    }

    /// Drops the whole job list and returns to idle, unconditionally.
    pub async fn clear(&self) {
        let mut core = self.core.lock().await;
        let discarded = core.state.segments().len();
        core.state.reduce(QueueDelta::Cleared);
        core.record_run(RunEventKind::Cleared);
        core.publish();
        info!("Queue cleared: {} segments discarded", discarded);
    }

    /// Merges every completed segment, in original order, into one container.
    ///
    /// Failed segments are skipped. Job state is left untouched, so repeated
    /// calls return the same audio for the same completed set.
    pub async fn merge_and_deliver(&self) -> Result<Arc<WavContainer>> {
        Ok(self.merge_completed().await?.merged)
    }

    /// Like [`merge_and_deliver`](Self::merge_and_deliver), but also hands back the
    /// per-segment audio. Both come from the same read of the list, so they agree
    /// even while a run keeps completing jobs.
    pub async fn merge_completed(&self) -> Result<Delivery> {
        let segments = self.core.lock().await.state.completed_audio();
        let audio: Vec<Arc<WavContainer>> = segments.iter().map(|(_, a)| Arc::clone(a)).collect();
        let merged = merge(&audio, self.config.sample_rate, self.config.silence_seconds)?;

        self.core.lock().await.telemetry.record(TelemetryEvent::Merge {
            segments: audio.len(),
            pcm_bytes: merged.pcm().len(),
        });
        info!(
            "Merged {} segments ({:.2}s of audio)",
            audio.len(),
            merged.duration_secs()
        );
        Ok(Delivery { segments, merged })
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes on the next published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<QueueSnapshot> {
        let mut rx = self.snapshots.clone();
        rx.borrow_and_update();
        rx
    }

    pub fn status(&self) -> RunStatus {
        self.snapshots.borrow().status
    }

    /// `completed / total` as an integer percentage.
    pub fn progress(&self) -> u8 {
        self.snapshots.borrow().progress_percent
    }

    pub async fn segments(&self) -> Vec<Segment> {
        self.core.lock().await.state.segments().to_vec()
    }

    pub async fn telemetry(&self) -> TelemetrySnapshot {
        self.core.lock().await.telemetry.snapshot()
    }

    async fn drive(&self, generation: u64, stop: StopSignal) -> RunOutcome {
        let mut guard = RunGuard::new(Arc::clone(&self.core), generation);
        let outcome = self.drive_jobs(generation, &stop, &mut guard).await;
        guard.disarm();
        outcome
    }

    async fn drive_jobs(&self, generation: u64, stop: &StopSignal, guard: &mut RunGuard) -> RunOutcome {
        loop {
            // Pick the next job under the writer lock.
            let (id, index, text) = {
                let mut core = self.core.lock().await;
                if core.state.generation() != generation {
                    return RunOutcome::Superseded;
                }

                let next = core
                    .state
                    .next_pending()
                    .map(|(index, s)| (s.id, index, s.text.clone()));
                let Some((id, index, text)) = next else {
                    core.state.reduce(QueueDelta::Halted);
                    core.record_run(RunEventKind::Finished);
                    core.publish();
                    info!(
                        "Synthesis run finished: {} completed, {} failed",
                        core.state.count(SegmentStatusKind::Completed),
                        core.state.count(SegmentStatusKind::Error)
                    );
                    return RunOutcome::Finished;
                };

                if stop.is_raised() {
                    core.state.reduce(QueueDelta::Halted);
                    core.record_run(RunEventKind::Stopped);
                    core.publish();
                    info!(
                        "Synthesis run stopped: {} segments left pending",
                        core.state.count(SegmentStatusKind::Pending)
                    );
                    return RunOutcome::Stopped;
                }

                core.state.reduce(QueueDelta::SegmentStarted(id));
                core.publish();
                guard.in_flight = Some(id);
                (id, index, text)
            };

            // The only suspension point: the external call. Writer lock is not held.
            let started = Instant::now();
            let result = {
                let _lane = self.lane.lock().await;
                debug!("Synthesizing segment {} ({})", index + 1, id);
                match self.synthesizer.synthesize(&text).await {
                    Ok(payload) => WavContainer::from_base64_pcm(&payload, self.config.sample_rate),
                    Err(e) => Err(e),
                }
            };
            let latency_ms = started.elapsed().as_millis() as u64;

            let mut core = self.core.lock().await;
            if core.state.generation() != generation {
                debug!("Discarding result for segment {} of a cleared list", id);
                return RunOutcome::Superseded;
            }

            let outcome = match result {
                Ok(wav) => {
                    debug!("Segment {} completed: {} PCM bytes", index + 1, wav.pcm().len());
                    core.state.reduce(QueueDelta::SegmentCompleted {
                        id,
                        audio: Arc::new(wav),
                    });
                    SegmentStatusKind::Completed
                }
                Err(e) => {
                    warn!("Segment {} failed: {}", index + 1, e);
                    core.state.reduce(QueueDelta::SegmentFailed {
                        id,
                        detail: e.to_string(),
                    });
                    SegmentStatusKind::Error
                }
            };
            guard.in_flight = None;
            core.telemetry.record(TelemetryEvent::SegmentSettled {
                segment_id: id,
                index,
                outcome,
                latency_ms,
            });
            core.publish();
        }
    }
}
