//! Infrastructure layer
//!
//! Concrete adapters behind the application ports: FFmpeg capture,
//! JSON file persistence, the HTTP translation backend and TOML config.

pub mod capture;
pub mod config;
pub mod library;
pub mod translation;

pub use capture::FfmpegCamera;
pub use config::XdgConfigStore;
pub use library::JsonLibraryStore;
pub use translation::HttpTranslationService;
