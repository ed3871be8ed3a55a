//! Video data value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidFormatError;

/// Supported video container formats.
/// Order of [`FORMAT_PREFERENCE`] decides which one a recording uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoFormat {
    Webm,
    Mp4,
}

/// Preference-ordered candidate formats: WebM primary, MP4 fallback.
pub const FORMAT_PREFERENCE: [VideoFormat; 2] = [VideoFormat::Webm, VideoFormat::Mp4];

impl VideoFormat {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "video/webm",
            Self::Mp4 => "video/mp4",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for VideoFormat {
    fn default() -> Self {
        Self::Webm
    }
}

impl FromStr for VideoFormat {
    type Err = InvalidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webm" | "video/webm" => Ok(Self::Webm),
            "mp4" | "video/mp4" => Ok(Self::Mp4),
            _ => Err(InvalidFormatError {
                input: s.to_string(),
            }),
        }
    }
}

/// Value object representing a finished recording ready to save or upload.
/// Contains encoded video bytes and their container format.
#[derive(Debug, Clone)]
pub struct VideoData {
    data: Vec<u8>,
    format: VideoFormat,
}

impl VideoData {
    /// Create VideoData from encoded bytes
    pub fn new(data: Vec<u8>, format: VideoFormat) -> Self {
        Self { data, format }
    }

    /// Get the raw encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the encoded bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the container format
    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode as a self-contained, re-playable data URI
    pub fn to_data_uri(&self) -> String {
        use base64::Engine;
        format!(
            "data:{};base64,{}",
            self.format.as_str(),
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}
