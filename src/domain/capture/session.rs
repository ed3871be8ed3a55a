//! Capture session state machine

use std::fmt;
use thiserror::Error;

use super::video_data::{VideoData, VideoFormat};

/// Capture lifecycle errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Camera device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No camera device acquired")]
    NoActiveDevice,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Recording produced no data")]
    EmptyRecording,

    #[error("No recorded data to assemble")]
    NoRecordedData,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Capture session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    DeviceReady,
    Recording,
    Stopped {
        has_data: bool,
    },
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DeviceReady => "device-ready",
            Self::Recording => "recording",
            Self::Stopped { .. } => "stopped",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capture session entity.
/// Owns the buffered chunks of one start-to-stop recording attempt and
/// enforces the lifecycle transitions.
///
/// State machine:
///   IDLE -> DEVICE_READY (device_acquired)
///   DEVICE_READY | STOPPED -> RECORDING (begin_recording)
///   RECORDING -> STOPPED { has_data } (finish_recording)
///   any -> DEVICE_READY | IDLE (reset, device kept)
///   any -> IDLE (release)
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
    chunks: Vec<Vec<u8>>,
    format: VideoFormat,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Check if a device is currently held
    pub fn device_held(&self) -> bool {
        self.state != CaptureState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// The container format chosen for the current take
    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Total bytes buffered so far
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Mark the device as acquired.
    /// Returns true if this was a fresh grant; re-acquiring while a device
    /// is already held is a no-op returning false.
    pub fn device_acquired(&mut self) -> bool {
        if self.state == CaptureState::Idle {
            self.state = CaptureState::DeviceReady;
            true
        } else {
            false
        }
    }

    /// Transition to RECORDING with the given format.
    /// Valid from DEVICE_READY or STOPPED; clears any buffered data.
    pub fn begin_recording(&mut self, format: VideoFormat) -> Result<(), CaptureError> {
        match self.state {
            CaptureState::Idle => Err(CaptureError::NoActiveDevice),
            CaptureState::Recording => Err(CaptureError::AlreadyRecording),
            CaptureState::DeviceReady | CaptureState::Stopped { .. } => {
                self.chunks.clear();
                self.format = format;
                self.state = CaptureState::Recording;
                Ok(())
            }
        }
    }

    /// Buffer one encoded chunk.
    /// Chunks arriving outside RECORDING (late callbacks) and empty chunks
    /// are dropped silently.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if self.state == CaptureState::Recording && !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Transition from RECORDING to STOPPED.
    /// Returns whether any data was buffered; a zero-chunk stop is the
    /// caller-reportable soft failure, not an invalid transition.
    pub fn finish_recording(&mut self) -> Result<bool, CaptureError> {
        if self.state != CaptureState::Recording {
            return Err(CaptureError::NotRecording);
        }
        let has_data = !self.chunks.is_empty();
        self.state = CaptureState::Stopped { has_data };
        Ok(has_data)
    }

    /// Concatenate buffered chunks into a single payload tagged with the
    /// chosen format. Valid only from STOPPED with data.
    pub fn assemble(&self) -> Result<VideoData, CaptureError> {
        if self.state != (CaptureState::Stopped { has_data: true }) {
            return Err(CaptureError::NoRecordedData);
        }
        let mut data = Vec::with_capacity(self.buffered_bytes());
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        Ok(VideoData::new(data, self.format))
    }

    /// Discard buffered data for another take.
    /// The device stays acquired: DEVICE_READY if held, IDLE otherwise.
    pub fn reset(&mut self) {
        self.chunks.clear();
        if self.state != CaptureState::Idle {
            self.state = CaptureState::DeviceReady;
        }
    }

    /// Release the device entirely and return to IDLE.
    pub fn release(&mut self) {
        self.chunks.clear();
        self.state = CaptureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_session() -> CaptureSession {
        let mut session = CaptureSession::new();
        session.device_acquired();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = CaptureSession::new();
        assert_eq!(session.state(), CaptureState::Idle);
        assert!(!session.device_held());
        assert!(!session.is_recording());
    }

    #[test]
    fn device_acquired_from_idle() {
        let mut session = CaptureSession::new();
        assert!(session.device_acquired());
        assert_eq!(session.state(), CaptureState::DeviceReady);
    }

    #[test]
    fn device_acquired_twice_is_noop() {
        let mut session = ready_session();
        assert!(!session.device_acquired());
        assert_eq!(session.state(), CaptureState::DeviceReady);
    }

    #[test]
    fn begin_recording_from_idle_fails() {
        let mut session = CaptureSession::new();
        assert!(matches!(
            session.begin_recording(VideoFormat::Webm),
            Err(CaptureError::NoActiveDevice)
        ));
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn begin_recording_from_ready() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        assert!(session.is_recording());
        assert_eq!(session.format(), VideoFormat::Webm);
    }

    #[test]
    fn begin_recording_while_recording_fails() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();

        assert!(matches!(
            session.begin_recording(VideoFormat::Webm),
            Err(CaptureError::AlreadyRecording)
        ));
        assert!(session.is_recording());
    }

    #[test]
    fn begin_recording_clears_previous_take() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![1, 2, 3]);
        session.finish_recording().unwrap();

        session.begin_recording(VideoFormat::Mp4).unwrap();
        assert_eq!(session.buffered_bytes(), 0);
        assert_eq!(session.format(), VideoFormat::Mp4);
    }

    #[test]
    fn finish_without_chunks_is_stopped_no_data() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();

        let has_data = session.finish_recording().unwrap();
        assert!(!has_data);
        assert_eq!(session.state(), CaptureState::Stopped { has_data: false });
    }

    #[test]
    fn finish_when_not_recording_fails() {
        let mut session = ready_session();
        assert!(matches!(
            session.finish_recording(),
            Err(CaptureError::NotRecording)
        ));
    }

    #[test]
    fn assemble_without_data_fails() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.finish_recording().unwrap();

        assert!(matches!(
            session.assemble(),
            Err(CaptureError::NoRecordedData)
        ));
    }

    #[test]
    fn assemble_concatenates_chunks() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![0u8; 10]);
        session.push_chunk(vec![1u8; 20]);
        session.push_chunk(vec![2u8; 30]);
        assert!(session.finish_recording().unwrap());

        let video = session.assemble().unwrap();
        assert_eq!(video.size_bytes(), 60);
        assert_eq!(video.format(), VideoFormat::Webm);
    }

    #[test]
    fn chunks_outside_recording_are_dropped() {
        let mut session = ready_session();
        session.push_chunk(vec![1, 2, 3]);
        assert_eq!(session.buffered_bytes(), 0);

        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![1, 2, 3]);
        session.finish_recording().unwrap();

        // Late callback after stop
        session.push_chunk(vec![4, 5, 6]);
        assert_eq!(session.buffered_bytes(), 3);
    }

    #[test]
    fn empty_chunks_are_dropped() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(Vec::new());
        assert_eq!(session.buffered_bytes(), 0);
    }

    #[test]
    fn reset_keeps_device() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![1, 2, 3]);

        session.reset();
        assert_eq!(session.state(), CaptureState::DeviceReady);
        assert_eq!(session.buffered_bytes(), 0);
    }

    #[test]
    fn reset_from_idle_stays_idle() {
        let mut session = CaptureSession::new();
        session.reset();
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn release_returns_to_idle() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![1, 2, 3]);

        session.release();
        assert_eq!(session.state(), CaptureState::Idle);
        assert_eq!(session.buffered_bytes(), 0);
    }

    #[test]
    fn restart_from_stopped() {
        let mut session = ready_session();
        session.begin_recording(VideoFormat::Webm).unwrap();
        session.push_chunk(vec![1]);
        session.finish_recording().unwrap();

        // Another take is valid from STOPPED
        session.begin_recording(VideoFormat::Webm).unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(CaptureState::Idle.to_string(), "idle");
        assert_eq!(CaptureState::DeviceReady.to_string(), "device-ready");
        assert_eq!(CaptureState::Recording.to_string(), "recording");
        assert_eq!(
            CaptureState::Stopped { has_data: true }.to_string(),
            "stopped"
        );
    }
}
