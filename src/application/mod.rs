//! Application layer
//!
//! Use cases and port interfaces. This layer orchestrates the domain
//! and depends only on the ports, never on concrete adapters.

pub mod capture;
pub mod ports;
pub mod save_recording;

pub use capture::{CaptureController, StateObserver};
pub use save_recording::{SaveError, SaveInput, SaveOutput, SaveRecordingUseCase};
