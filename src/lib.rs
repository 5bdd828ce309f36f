pub mod audio;
pub mod config;
pub mod error;
pub mod outputs;
pub mod queue;
pub mod services;
pub mod text;

// Re-export specific items for convenient access
pub use audio::WavContainer;
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use queue::{RunOutcome, SegmentQueue};
pub use services::synthesis::Synthesizer;
