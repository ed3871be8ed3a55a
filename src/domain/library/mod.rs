//! Library domain: saved recording entries

pub mod entry;

pub use entry::{MediaPayload, RecognitionResult, RecordingEntry, TranslationResult};
