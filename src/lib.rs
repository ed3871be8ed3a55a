//! SignScribe - sign language video recording and translation CLI
//!
//! This crate records ASL videos from a camera, keeps them in a local
//! JSON library and can submit them to a recognition/translation backend.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (FFmpeg, JSON store, HTTP backend)
//! - **CLI**: Command-line interface and argument parsing

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
