//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod camera;
pub mod config;
pub mod library;
pub mod translator;

// Re-export common types
pub use camera::CameraDevice;
pub use config::ConfigStore;
pub use library::{LibraryError, LibraryStore};
pub use translator::{Enrichment, EnrichmentError, TranslationService};
