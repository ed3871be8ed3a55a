//! Capture controller
//!
//! Drives one camera device and one recording session at a time. The
//! controller owns the lifecycle; UI indicators are external collaborators
//! notified through the state-change observer, never mutated here.

use tokio::sync::mpsc;

use crate::domain::capture::{
    CaptureError, CaptureSession, CaptureState, VideoData, VideoFormat, FORMAT_PREFERENCE,
};

use super::ports::CameraDevice;

/// Observer invoked after every state transition
pub type StateObserver = Box<dyn Fn(CaptureState) + Send + Sync>;

/// Controller for the camera device and the active recording session
pub struct CaptureController<D: CameraDevice> {
    device: D,
    session: CaptureSession,
    chunk_rx: Option<mpsc::Receiver<Vec<u8>>>,
    on_state_change: Option<StateObserver>,
}

impl<D: CameraDevice> CaptureController<D> {
    /// Create a controller around a camera device port
    pub fn new(device: D) -> Self {
        Self {
            device,
            session: CaptureSession::new(),
            chunk_rx: None,
            on_state_change: None,
        }
    }

    /// Register a state-change observer
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.on_state_change = Some(observer);
        self
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> CaptureState {
        self.session.state()
    }

    fn notify(&self) {
        if let Some(ref cb) = self.on_state_change {
            cb(self.session.state());
        }
    }

    /// Request the camera. A no-op returning the existing grant while a
    /// device is already held; `DeviceUnavailable` leaves the controller
    /// idle and retryable.
    pub async fn acquire_device(&mut self) -> Result<(), CaptureError> {
        if self.session.device_held() {
            return Ok(());
        }
        self.device.acquire().await?;
        self.session.device_acquired();
        self.notify();
        Ok(())
    }

    /// Start a recording session.
    ///
    /// The container format is the first runtime-supported entry of the
    /// candidate list (`preferred` first, then the default preference
    /// order); when nothing reports support the last candidate is used
    /// unconditionally. Never discards an unsaved take silently: from
    /// RECORDING this is `AlreadyRecording`, and a stopped take must be
    /// saved or reset by the caller first.
    pub async fn start_recording(
        &mut self,
        preferred: Option<VideoFormat>,
    ) -> Result<VideoFormat, CaptureError> {
        match self.session.state() {
            CaptureState::Idle => return Err(CaptureError::NoActiveDevice),
            CaptureState::Recording => return Err(CaptureError::AlreadyRecording),
            CaptureState::DeviceReady | CaptureState::Stopped { .. } => {}
        }

        let format = self.select_format(preferred);
        let rx = self.device.begin(format).await?;
        self.session.begin_recording(format)?;
        self.chunk_rx = Some(rx);
        self.notify();
        Ok(format)
    }

    fn select_format(&self, preferred: Option<VideoFormat>) -> VideoFormat {
        let candidates: Vec<VideoFormat> = preferred
            .into_iter()
            .chain(FORMAT_PREFERENCE)
            .collect();

        candidates
            .iter()
            .copied()
            .find(|f| self.device.supports(*f))
            .unwrap_or_else(|| *candidates.last().unwrap_or(&VideoFormat::Webm))
    }

    /// Stop the active recording and buffer the remaining chunks.
    ///
    /// Transitions to STOPPED either way, even when the device stop itself
    /// fails: the chunks already delivered are kept and the device error is
    /// surfaced after the session is finalized, so the controller never
    /// sticks in RECORDING. A take with zero chunks is the soft failure
    /// `EmptyRecording` and the controller stays usable.
    pub async fn stop_recording(&mut self) -> Result<(), CaptureError> {
        if !self.session.is_recording() {
            return Err(CaptureError::NotRecording);
        }

        let end_result = self.device.end().await;

        // The device closes the channel after flushing its tail chunk. A
        // failed stop may leave the channel open, so only chunks already
        // delivered are drained in that case.
        if let Some(mut rx) = self.chunk_rx.take() {
            match end_result {
                Ok(()) => {
                    while let Some(chunk) = rx.recv().await {
                        self.session.push_chunk(chunk);
                    }
                }
                Err(_) => {
                    while let Ok(chunk) = rx.try_recv() {
                        self.session.push_chunk(chunk);
                    }
                }
            }
        }

        let has_data = self.session.finish_recording()?;
        self.notify();

        end_result?;

        if has_data {
            Ok(())
        } else {
            Err(CaptureError::EmptyRecording)
        }
    }

    /// Assemble the finished take into one payload tagged with the chosen
    /// format. `NoRecordedData` unless stopped with data.
    pub fn to_video(&self) -> Result<VideoData, CaptureError> {
        self.session.assemble()
    }

    /// Discard the current take but keep the device for another one
    pub async fn reset(&mut self) {
        if self.session.is_recording() {
            let _ = self.device.end().await;
        }
        self.chunk_rx = None;
        self.session.reset();
        self.notify();
    }

    /// Stop everything and release the device handle.
    /// Best-effort on teardown; always leaves the controller IDLE.
    pub async fn release(&mut self) {
        if self.session.is_recording() {
            let _ = self.device.end().await;
        }
        self.chunk_rx = None;
        self.device.release().await;
        self.session.release();
        self.notify();
    }
}
