//! Queue lifecycle telemetry.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (segment text, PCM, base64 payloads).
//! Only segment IDs, counts, byte lengths and durations are allowed.
//!
//! Telemetry is write-only from the orchestrator's point of view: it is never
//! consulted when deciding which job runs next.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{RunEventKind, TelemetryEvent};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
