pub mod merge;
pub mod wav;

pub use merge::merge;
pub use wav::WavContainer;
