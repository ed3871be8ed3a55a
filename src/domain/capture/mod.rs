//! Capture domain: recording session lifecycle and media value objects

pub mod duration;
pub mod session;
pub mod video_data;

pub use duration::Duration;
pub use session::{CaptureError, CaptureSession, CaptureState};
pub use video_data::{VideoData, VideoFormat, FORMAT_PREFERENCE};
