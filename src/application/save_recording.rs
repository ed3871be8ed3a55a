//! Save-recording use case
//!
//! Persists a finished take to the library, optionally enriching it with
//! recognition and translation metadata first. Enrichment failure is a
//! soft failure by default: the recording is saved unenriched and the
//! error is surfaced alongside the saved entry.

use thiserror::Error;

use crate::domain::capture::VideoData;
use crate::domain::library::RecordingEntry;

use super::ports::{EnrichmentError, LibraryError, LibraryStore, TranslationService};

/// Save-recording errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
}

/// Options for one save
#[derive(Debug, Clone, Default)]
pub struct SaveInput {
    pub display_name: Option<String>,
    /// Submit the video for recognition/translation before saving
    pub translate: bool,
    /// On enrichment failure, keep the unenriched recording instead of
    /// failing the whole save
    pub keep_on_failure: bool,
}

/// Outcome of one save
#[derive(Debug)]
pub struct SaveOutput {
    /// The entry as persisted, with its assigned id
    pub entry: RecordingEntry,
    pub enriched: bool,
    /// Present when enrichment was requested but failed and the entry
    /// was kept anyway
    pub enrichment_error: Option<EnrichmentError>,
}

/// Use case: turn a finished recording into a persisted library entry
pub struct SaveRecordingUseCase<S: LibraryStore, T: TranslationService> {
    store: S,
    translator: T,
}

impl<S: LibraryStore, T: TranslationService> SaveRecordingUseCase<S, T> {
    pub fn new(store: S, translator: T) -> Self {
        Self { store, translator }
    }

    /// Save a recording, enriching it first when requested.
    ///
    /// A persistence failure is always hard: the caller must never be
    /// told the recording was saved when the write was rejected.
    pub async fn execute(
        &self,
        video: &VideoData,
        input: SaveInput,
    ) -> Result<SaveOutput, SaveError> {
        let mut entry = RecordingEntry::from_video(video, input.display_name);
        let mut enrichment_error = None;

        if input.translate {
            match self.translator.translate(video).await {
                Ok(enrichment) => {
                    entry.recognition = enrichment.recognition;
                    entry.translation = enrichment.translation;
                    entry.remote_id = enrichment.remote_id;
                }
                Err(err) if input.keep_on_failure => {
                    enrichment_error = Some(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let enriched = entry.is_enriched();
        let entry = self.store.append(entry).await?;

        Ok(SaveOutput {
            entry,
            enriched,
            enrichment_error,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }
}
