//! Main app runners for the record, list, delete and export commands

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use base64::Engine;
use tokio::time::{interval, Duration as TokioDuration};

use crate::application::ports::{ConfigStore, LibraryError, LibraryStore, TranslationService};
use crate::application::{CaptureController, SaveInput, SaveRecordingUseCase};
use crate::domain::capture::CaptureError;
use crate::domain::config::AppConfig;
use crate::domain::library::{MediaPayload, RecordingEntry};
use crate::infrastructure::{
    FfmpegCamera, HttpTranslationService, JsonLibraryStore, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Record one video and save it to the library
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let camera = FfmpegCamera::new(&options.device);
    let mut controller = CaptureController::new(camera);

    presenter.start_spinner("Acquiring camera...");
    if let Err(e) = controller.acquire_device().await {
        presenter.spinner_fail(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let format = match controller.start_recording(options.format).await {
        Ok(format) => format,
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            controller.release().await;
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.update_spinner(&format!("Recording ({})...", format.extension()));

    // Record until the duration elapses or the user interrupts
    let total_secs = options.duration.as_secs();
    let start = Instant::now();
    let mut ticker = interval(TokioDuration::from_millis(250));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let elapsed = start.elapsed().as_secs();
                if elapsed >= total_secs {
                    break;
                }
                presenter.update_recording_progress(elapsed, total_secs);
            }
        }
    }

    match controller.stop_recording().await {
        Ok(()) => {}
        Err(CaptureError::EmptyRecording) => {
            presenter.spinner_fail("Recording produced no data");
            controller.release().await;
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            controller.release().await;
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let video = match controller.to_video() {
        Ok(video) => video,
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            controller.release().await;
            return ExitCode::from(EXIT_ERROR);
        }
    };
    controller.release().await;

    presenter.spinner_success(&format!(
        "Recording complete ({}, {})",
        video.human_readable_size(),
        video.format().extension()
    ));

    // Save, enriching first when asked
    let store = library_store(options.library.as_deref());
    let service = HttpTranslationService::new(&options.endpoint);
    let use_case = SaveRecordingUseCase::new(store, service);

    if options.translate {
        presenter.start_spinner("Translating...");
    }

    let input = SaveInput {
        display_name: options.name,
        translate: options.translate,
        keep_on_failure: true,
    };

    match use_case.execute(&video, input).await {
        Ok(output) => {
            if let Some(err) = output.enrichment_error {
                presenter.spinner_fail(&format!(
                    "Translation failed: {}. Recording saved without translation.",
                    err
                ));
            } else if output.enriched {
                presenter.spinner_success("Translation complete");
                present_enrichment(&presenter, &output.entry);
            } else {
                presenter.stop_spinner();
            }

            presenter.success(&format!(
                "Saved '{}' [{}]",
                output.entry.display_name, output.entry.id
            ));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List saved recordings, newest first
pub async fn run_list(library: Option<&str>) -> ExitCode {
    let presenter = Presenter::new();
    let store = library_store(library);

    let entries = match store.list().await {
        Ok(entries) => entries,
        Err(LibraryError::CorruptStore(msg)) => {
            // Degrade to an empty view; the file is left untouched
            presenter.warn(&format!("Library could not be read: {}", msg));
            Vec::new()
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if entries.is_empty() {
        presenter.info("No recordings yet");
        return ExitCode::from(EXIT_SUCCESS);
    }

    for (i, entry) in entries.iter().rev().enumerate() {
        let size = entry
            .byte_size
            .map(|b| format!("  {}", human_size(b)))
            .unwrap_or_default();
        presenter.output(&format!(
            "{}. {}  ({}){}  [{}]",
            i + 1,
            entry.display_name,
            entry.created_at,
            size,
            entry.id
        ));
        if let Some(ref translation) = entry.translation {
            presenter.output(&format!("   \"{}\"", translation.text));
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Delete a recording, confirming first unless told otherwise
pub async fn run_delete(id: &str, yes: bool, library: Option<&str>, endpoint: &str) -> ExitCode {
    let presenter = Presenter::new();
    let store = library_store(library);

    let entries = match store.list().await {
        Ok(entries) => entries,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let Some(entry) = entries.iter().find(|e| e.id == id) else {
        // Deleting something already gone is not a failure
        presenter.warn(&format!("No recording with id {}", id));
        return ExitCode::from(EXIT_SUCCESS);
    };

    if !yes && !confirm(&format!("Delete '{}'?", entry.display_name)) {
        presenter.info("Aborted");
        return ExitCode::from(EXIT_SUCCESS);
    }

    // Best-effort: the local entry goes away even if the remote copy stays
    if let Some(remote_id) = entry.remote_id.as_deref() {
        let service = HttpTranslationService::new(endpoint);
        if let Err(e) = service.delete(remote_id).await {
            presenter.warn(&format!("Could not delete remote copy: {}", e));
        }
    }

    if let Err(e) = store.remove(id).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.success(&format!("Deleted '{}'", entry.display_name));
    ExitCode::from(EXIT_SUCCESS)
}

/// Export a recording's media bytes to a file
pub async fn run_export(id: &str, output: &Path, library: Option<&str>, endpoint: &str) -> ExitCode {
    let presenter = Presenter::new();
    let store = library_store(library);

    let entries = match store.list().await {
        Ok(entries) => entries,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let Some(entry) = entries.iter().find(|e| e.id == id) else {
        presenter.error(&format!("No recording with id {}", id));
        return ExitCode::from(EXIT_ERROR);
    };

    let bytes = match entry.media_payload() {
        Some(MediaPayload::DataUri(uri)) => match decode_data_uri(uri) {
            Ok(bytes) => bytes,
            Err(e) => {
                presenter.error(&format!("Stored media is unreadable: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        },
        Some(MediaPayload::Remote(remote_id)) => {
            let service = HttpTranslationService::new(endpoint);
            match service.fetch_video(remote_id).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    presenter.error(&format!("Could not fetch remote media: {}", e));
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
        None => {
            presenter.error("Recording has no media payload");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = tokio::fs::write(output, &bytes).await {
        presenter.error(&format!("Could not write {}: {}", output.display(), e));
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.success(&format!(
        "Exported '{}' to {} ({} bytes)",
        entry.display_name,
        output.display(),
        bytes.len()
    ));
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration: defaults < file < CLI.
/// Environment variables are layered in by the argument parser.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

fn library_store(path: Option<&str>) -> JsonLibraryStore {
    match path {
        Some(path) => JsonLibraryStore::with_path(path),
        None => JsonLibraryStore::new(),
    }
}

fn present_enrichment(presenter: &Presenter, entry: &RecordingEntry) {
    if let Some(ref recognition) = entry.recognition {
        presenter.output(&format!(
            "Recognized: {} ({:.0}%)",
            recognition.sequence,
            recognition.confidence * 100.0
        ));
    }
    if let Some(ref translation) = entry.translation {
        presenter.output(&format!("Translation: {}", translation.text));
        for suggestion in &translation.suggestions {
            presenter.output(&format!("  alternative: {}", suggestion));
        }
    }
}

fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Prompt on stderr and read a y/N answer from stdin
fn confirm(question: &str) -> bool {
    eprint!("{} [y/N] ", question);
    let _ = io::stderr().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Decode the payload of a `data:<mime>;base64,<data>` URI
fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let (_, encoded) = uri
        .split_once(',')
        .ok_or_else(|| "not a data URI".to_string())?;

    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| e.to_string())
}
