//! Camera device port interface

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::capture::{CaptureError, VideoFormat};

/// Port for the camera/microphone device.
///
/// The device is a singleton shared resource: one acquisition may be
/// active at a time, and acquiring while already held must be a no-op
/// returning the existing grant. Encoded chunks are delivered over the
/// channel returned by `begin`; the channel closes once the final chunk
/// after `end` has been flushed.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request combined audio+video capture.
    ///
    /// # Returns
    /// Ok on grant; `DeviceUnavailable` on denial or missing hardware.
    async fn acquire(&self) -> Result<(), CaptureError>;

    /// Whether the runtime can encode this container format.
    fn supports(&self, format: VideoFormat) -> bool;

    /// Begin capturing in the given format.
    ///
    /// # Returns
    /// A receiver of encoded chunks, or `StartFailed`/`NoActiveDevice`.
    async fn begin(&self, format: VideoFormat) -> Result<mpsc::Receiver<Vec<u8>>, CaptureError>;

    /// Finalize the capture so the encoder flushes its tail chunk.
    async fn end(&self) -> Result<(), CaptureError>;

    /// Release the hardware handle entirely. Idempotent.
    async fn release(&self);
}
