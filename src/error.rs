use thiserror::Error;

/// Errors raised by the voxline pipeline.
///
/// Per-segment failures (`Decode`, `Synthesis`, `Http`) never escape a run: the
/// orchestrator folds them into that segment's status. Everything else is a
/// caller-facing contract error.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("segmentation failed: {0}")]
    Segmentation(String),

    #[error("malformed PCM payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("synthesis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PCM payload of {0} bytes does not fit in a WAV container")]
    PayloadTooLarge(usize),

    #[error("no completed segments to merge")]
    NoInput,

    #[error("a synthesis run is already in progress")]
    AlreadyRunning,

    #[error("no synthesis run is in progress")]
    NotRunning,

    #[error("no pending segments to continue")]
    NothingToResume,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
