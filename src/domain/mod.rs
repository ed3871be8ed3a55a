//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod library;

// Re-export common types
pub use capture::{CaptureError, CaptureSession, CaptureState, Duration, VideoData, VideoFormat};
pub use config::AppConfig;
pub use error::*;
pub use library::{RecognitionResult, RecordingEntry, TranslationResult};
