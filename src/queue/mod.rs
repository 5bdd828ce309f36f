pub mod cancel;
pub mod orchestrator;
pub mod segment;
pub mod state;
pub mod telemetry;

pub use orchestrator::{Delivery, RunOutcome, SegmentQueue};
pub use segment::{Segment, SegmentId, SegmentStatus, SegmentStatusKind};
pub use state::{QueueSnapshot, RunStatus};
