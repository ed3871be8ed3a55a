//! Recording entry entity

use serde::{Deserialize, Serialize};

use crate::domain::capture::VideoData;

/// Recognition metadata returned by the translation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub sequence: String,
    pub confidence: f64,
}

/// Translation metadata returned by the translation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub confidence: f64,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// The media payload of an entry: either a self-contained data URI
/// or an identifier resolved through the service's playback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPayload<'a> {
    DataUri(&'a str),
    Remote(&'a str),
}

/// One saved recording in the library.
///
/// All fields default on deserialization so a malformed entry parses
/// instead of failing the whole store; validity is checked separately
/// with [`RecordingEntry::is_valid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognition: Option<RecognitionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationResult>,
}

impl RecordingEntry {
    /// Create an entry from a finished recording.
    /// The id is left empty; the store assigns one at append time.
    pub fn from_video(video: &VideoData, display_name: Option<String>) -> Self {
        let created_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let display_name =
            display_name.unwrap_or_else(|| format!("ASL Recording {}", created_at));

        Self {
            id: String::new(),
            display_name,
            created_at,
            data_uri: Some(video.to_data_uri()),
            remote_id: None,
            byte_size: Some(video.size_bytes() as u64),
            recognition: None,
            translation: None,
        }
    }

    /// The entry's media payload, if it has one
    pub fn media_payload(&self) -> Option<MediaPayload<'_>> {
        if let Some(uri) = self.data_uri.as_deref() {
            Some(MediaPayload::DataUri(uri))
        } else {
            self.remote_id.as_deref().map(MediaPayload::Remote)
        }
    }

    /// An entry is renderable only with a display name and a media payload
    pub fn is_valid(&self) -> bool {
        !self.display_name.is_empty() && self.media_payload().is_some()
    }

    /// Whether the entry carries recognition or translation metadata
    pub fn is_enriched(&self) -> bool {
        self.recognition.is_some() || self.translation.is_some()
    }
}
