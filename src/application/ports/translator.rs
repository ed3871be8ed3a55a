//! Translation service port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::VideoData;
use crate::domain::library::{RecognitionResult, TranslationResult};

/// Enrichment errors
#[derive(Debug, Clone, Error)]
pub enum EnrichmentError {
    #[error("Translation request failed: {0}")]
    Failed(String),

    #[error("Translation service rejected the video: {0}")]
    Rejected(String),

    #[error("Failed to parse translation response: {0}")]
    ParseError(String),
}

/// Metadata merged into an entry after a successful external call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub recognition: Option<RecognitionResult>,
    pub translation: Option<TranslationResult>,
    /// Identifier of the uploaded video on the remote service, when the
    /// service retains a copy for playback.
    pub remote_id: Option<String>,
}

/// Port for the external recognition/translation service
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Submit a finished recording for recognition and translation.
    ///
    /// # Returns
    /// The enrichment metadata, or a typed failure: `Rejected` for a
    /// remote error envelope, `Failed` for transport errors.
    async fn translate(&self, video: &VideoData) -> Result<Enrichment, EnrichmentError>;

    /// Delete an uploaded video from the remote service.
    async fn delete(&self, remote_id: &str) -> Result<(), EnrichmentError>;

    /// Fetch the raw media bytes of an uploaded video.
    async fn fetch_video(&self, remote_id: &str) -> Result<Vec<u8>, EnrichmentError>;

    /// The streaming playback URL for an uploaded video.
    fn playback_url(&self, remote_id: &str) -> String;
}
