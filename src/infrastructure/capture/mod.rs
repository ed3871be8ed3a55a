//! Capture infrastructure adapters

pub mod ffmpeg;

pub use ffmpeg::FfmpegCamera;
