//! FFmpeg-based camera adapter
//!
//! Records from a V4L2 device by spawning `ffmpeg` with its output on a
//! pipe, streaming encoded chunks into a channel as they arrive. Stopping
//! sends SIGINT so FFmpeg finalizes the container before exiting.

use std::process::Stdio;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Mutex};

use crate::application::ports::CameraDevice;
use crate::domain::capture::{CaptureError, VideoFormat};

/// Chunk size for reading the encoder pipe
const CHUNK_BYTES: usize = 64 * 1024;

/// FFmpeg camera recorder for a V4L2 device
pub struct FfmpegCamera {
    device: String,
    process: Arc<Mutex<Option<Child>>>,
    /// Encoder availability, probed once at acquire time
    supported: Arc<StdMutex<Vec<VideoFormat>>>,
}

impl FfmpegCamera {
    /// Create a recorder for the given V4L2 device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            process: Arc::new(Mutex::new(None)),
            supported: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Build FFmpeg args for streaming combined audio+video capture to stdout
    fn build_ffmpeg_args(&self, format: VideoFormat) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            "v4l2".to_string(),
            "-i".to_string(),
            self.device.clone(),
            "-f".to_string(),
            "pulse".to_string(),
            "-i".to_string(),
            "default".to_string(),
        ];

        match format {
            VideoFormat::Webm => {
                args.extend([
                    "-c:v".to_string(),
                    "libvpx".to_string(),
                    "-b:v".to_string(),
                    "1M".to_string(),
                    "-c:a".to_string(),
                    "libopus".to_string(),
                    "-b:a".to_string(),
                    "64k".to_string(),
                    "-f".to_string(),
                    "webm".to_string(),
                ]);
            }
            VideoFormat::Mp4 => {
                // MP4 needs fragmented output to be written to a pipe
                args.extend([
                    "-c:v".to_string(),
                    "libx264".to_string(),
                    "-preset".to_string(),
                    "veryfast".to_string(),
                    "-c:a".to_string(),
                    "aac".to_string(),
                    "-b:a".to_string(),
                    "128k".to_string(),
                    "-movflags".to_string(),
                    "frag_keyframe+empty_moov".to_string(),
                    "-f".to_string(),
                    "mp4".to_string(),
                ]);
            }
        }

        args.push("pipe:1".to_string());
        args
    }

    /// Spawn FFmpeg with stdout piped
    fn spawn_ffmpeg(args: Vec<String>) -> Result<Child, CaptureError> {
        Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CaptureError::StartFailed("ffmpeg not found in PATH".to_string())
                } else {
                    CaptureError::StartFailed(e.to_string())
                }
            })
    }

    /// Probe which container formats the local FFmpeg can encode
    async fn probe_encoders() -> Vec<VideoFormat> {
        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .await;

        let Ok(output) = output else {
            return Vec::new();
        };

        let listing = String::from_utf8_lossy(&output.stdout);
        let mut formats = Vec::new();
        if listing.contains("libvpx") {
            formats.push(VideoFormat::Webm);
        }
        if listing.contains("libx264") {
            formats.push(VideoFormat::Mp4);
        }
        formats
    }

    /// Send signal to the FFmpeg process
    fn send_signal(child: &Child, sig: Signal) -> Result<(), CaptureError> {
        if let Some(id) = child.id() {
            signal::kill(Pid::from_raw(id as i32), sig)
                .map_err(|e| CaptureError::CaptureFailed(format!("Signal failed: {}", e)))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CameraDevice for FfmpegCamera {
    async fn acquire(&self) -> Result<(), CaptureError> {
        tokio::fs::metadata(&self.device).await.map_err(|_| {
            CaptureError::DeviceUnavailable(format!("{} does not exist", self.device))
        })?;

        let formats = Self::probe_encoders().await;
        *self.supported.lock().unwrap() = formats;
        Ok(())
    }

    fn supports(&self, format: VideoFormat) -> bool {
        self.supported.lock().unwrap().contains(&format)
    }

    async fn begin(
        &self,
        format: VideoFormat,
    ) -> Result<mpsc::Receiver<Vec<u8>>, CaptureError> {
        let mut process_guard = self.process.lock().await;
        if process_guard.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let args = self.build_ffmpeg_args(format);
        let mut child = Self::spawn_ffmpeg(args)?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::StartFailed("FFmpeg stdout not piped".to_string()))?;

        let (tx, rx) = mpsc::channel(32);

        // Reader ends at pipe EOF, which drops tx and closes the channel
        tokio::spawn(async move {
            let mut buf = vec![0u8; CHUNK_BYTES];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        *process_guard = Some(child);
        Ok(rx)
    }

    async fn end(&self) -> Result<(), CaptureError> {
        let mut process_guard = self.process.lock().await;
        let mut child = process_guard
            .take()
            .ok_or(CaptureError::NotRecording)?;

        // SIGINT so FFmpeg flushes and finalizes the container
        Self::send_signal(&child, Signal::SIGINT)?;

        child
            .wait()
            .await
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        Ok(())
    }

    async fn release(&self) {
        let mut process_guard = self.process.lock().await;
        if let Some(mut child) = process_guard.take() {
            let _ = Self::send_signal(&child, Signal::SIGKILL);
            let _ = child.wait().await;
        }
    }
}
