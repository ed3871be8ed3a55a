//! HTTP translation service adapter
//!
//! Talks to the recognition/translation backend over its REST surface:
//! multipart upload for recognition plus translation, delete and raw
//! media fetch by the id the backend assigned at upload time.

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{Enrichment, EnrichmentError, TranslationService};
use crate::domain::capture::VideoData;
use crate::domain::library::{RecognitionResult, TranslationResult};

/// Multipart field name the backend expects
const VIDEO_FIELD: &str = "video";

// Response types for the backend API

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    file_id: Option<String>,
    #[serde(default)]
    asl_recognition: Option<RecognitionPayload>,
    #[serde(default)]
    translation: Option<TranslationPayload>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecognitionPayload {
    sequence: String,
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct TranslationPayload {
    english_text: String,
    confidence: f64,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Translation service over HTTP
pub struct HttpTranslationService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTranslationService {
    /// Create a client for the given service endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    fn delete_url(&self, remote_id: &str) -> String {
        format!("{}/delete/{}", self.base_url, remote_id)
    }

    /// Map the upload response body into enrichment metadata
    fn map_enrichment(response: UploadResponse) -> Result<Enrichment, EnrichmentError> {
        if let Some(message) = response.error {
            return Err(EnrichmentError::Rejected(message));
        }

        Ok(Enrichment {
            recognition: response.asl_recognition.map(|r| RecognitionResult {
                sequence: r.sequence,
                confidence: r.confidence,
            }),
            translation: response.translation.map(|t| TranslationResult {
                text: t.english_text,
                confidence: t.confidence,
                suggestions: t.suggestions,
            }),
            remote_id: response.file_id,
        })
    }

    /// Turn a non-2xx response into the right error class
    async fn error_from_response(response: reqwest::Response) -> EnrichmentError {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse { error: Some(msg) }) => msg,
            _ => format!("HTTP {}", status),
        };

        if status.is_client_error() {
            EnrichmentError::Rejected(message)
        } else {
            EnrichmentError::Failed(message)
        }
    }
}

#[async_trait]
impl TranslationService for HttpTranslationService {
    async fn translate(&self, video: &VideoData) -> Result<Enrichment, EnrichmentError> {
        let part = multipart::Part::bytes(video.data().to_vec())
            .file_name(format!("recording.{}", video.format().extension()))
            .mime_str(video.format().as_str())
            .map_err(|e| EnrichmentError::Failed(e.to_string()))?;

        let form = multipart::Form::new().part(VIDEO_FIELD, part);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| EnrichmentError::Failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::ParseError(e.to_string()))?;

        Self::map_enrichment(body)
    }

    async fn delete(&self, remote_id: &str) -> Result<(), EnrichmentError> {
        let response = self
            .client
            .delete(self.delete_url(remote_id))
            .send()
            .await
            .map_err(|e| EnrichmentError::Failed(e.to_string()))?;

        // An already-deleted remote copy is fine
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }

    async fn fetch_video(&self, remote_id: &str) -> Result<Vec<u8>, EnrichmentError> {
        let response = self
            .client
            .get(self.playback_url(remote_id))
            .send()
            .await
            .map_err(|e| EnrichmentError::Failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EnrichmentError::Failed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn playback_url(&self, remote_id: &str) -> String {
        format!("{}/video/{}", self.base_url, remote_id)
    }
}
