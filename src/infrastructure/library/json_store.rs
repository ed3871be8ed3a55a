//! JSON file library store adapter
//!
//! One JSON document holds the whole library. Every mutation is a
//! read-modify-write of the full document, serialized behind a lock so
//! back-to-back appends and removes apply in issuance order.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{LibraryError, LibraryStore};
use crate::domain::library::RecordingEntry;

const SCHEMA_VERSION: u32 = 1;

/// On-disk document shape
#[derive(Debug, Serialize, Deserialize)]
struct LibraryDocument {
    version: u32,
    entries: Vec<RecordingEntry>,
}

impl LibraryDocument {
    fn empty() -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

/// Library store backed by a single JSON file
pub struct JsonLibraryStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonLibraryStore {
    /// Create a store at the default XDG data path
    pub fn new() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("signscribe");

        Self::with_path(data_dir.join("library.json"))
    }

    /// Create a store at a custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Parse the document, accepting the legacy bare-array layout.
    /// Anything else is `CorruptStore`; the file is never overwritten
    /// with an empty library on a parse failure.
    fn parse_document(content: &str) -> Result<LibraryDocument, LibraryError> {
        if let Ok(doc) = serde_json::from_str::<LibraryDocument>(content) {
            return Ok(doc);
        }

        // Earlier versions stored a bare array of entries
        if let Ok(entries) = serde_json::from_str::<Vec<RecordingEntry>>(content) {
            return Ok(LibraryDocument {
                version: SCHEMA_VERSION,
                entries,
            });
        }

        Err(LibraryError::CorruptStore(
            "file is not a valid library document".to_string(),
        ))
    }

    async fn load_document(&self) -> Result<LibraryDocument, LibraryError> {
        if !self.path.exists() {
            return Ok(LibraryDocument::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| LibraryError::PersistenceUnavailable(e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(LibraryDocument::empty());
        }

        Self::parse_document(&content)
    }

    async fn save_document(&self, doc: &LibraryDocument) -> Result<(), LibraryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LibraryError::PersistenceUnavailable(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(doc)
            .map_err(|e| LibraryError::PersistenceUnavailable(e.to_string()))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| LibraryError::PersistenceUnavailable(e.to_string()))
    }
}

impl Default for JsonLibraryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LibraryStore for JsonLibraryStore {
    async fn list(&self) -> Result<Vec<RecordingEntry>, LibraryError> {
        let _guard = self.lock.lock().await;
        let doc = self.load_document().await?;

        // Malformed entries render nothing useful; skip them
        Ok(doc.entries.into_iter().filter(|e| e.is_valid()).collect())
    }

    async fn append(&self, mut entry: RecordingEntry) -> Result<RecordingEntry, LibraryError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_document().await?;

        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }

        doc.entries.push(entry.clone());
        self.save_document(&doc).await?;
        Ok(entry)
    }

    async fn remove(&self, id: &str) -> Result<(), LibraryError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_document().await?;

        if let Some(pos) = doc.entries.iter().position(|e| e.id == id) {
            doc.entries.remove(pos);
            self.save_document(&doc).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::domain::capture::{VideoData, VideoFormat};

    fn store_in(dir: &TempDir) -> JsonLibraryStore {
        JsonLibraryStore::with_path(dir.path().join("library.json"))
    }

    fn entry(name: &str) -> RecordingEntry {
        let video = VideoData::new(vec![1, 2, 3], VideoFormat::Webm);
        RecordingEntry::from_video(&video, Some(name.to_string()))
    }

    #[tokio::test]
    async fn missing_file_is_empty_library() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_assigns_id_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let saved = store.append(entry("Take 1")).await.unwrap();
        assert!(!saved.id.is_empty());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, saved.id);
        assert_eq!(listed[0].display_name, "Take 1");
    }

    #[tokio::test]
    async fn insertion_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for i in 0..5 {
            store.append(entry(&format!("Take {}", i))).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.display_name)
            .collect();
        assert_eq!(names, vec!["Take 0", "Take 1", "Take 2", "Take 3", "Take 4"]);
    }

    #[tokio::test]
    async fn remove_deletes_only_the_matching_entry() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let a = store.append(entry("A")).await.unwrap();
        let b = store.append(entry("B")).await.unwrap();
        let c = store.append(entry("C")).await.unwrap();

        store.remove(&b.id).await.unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn remove_missing_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(entry("Keep")).await.unwrap();
        store.remove("no-such-id").await.unwrap();
        store.remove("no-such-id").await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_are_unique_across_appends() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut ids = std::collections::HashSet::new();
        for i in 0..100 {
            let saved = store.append(entry(&format!("Take {}", i))).await.unwrap();
            assert!(ids.insert(saved.id));
        }
    }

    #[tokio::test]
    async fn malformed_entries_are_filtered_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(
            &path,
            r#"{"version":1,"entries":[
                {"id":"a","display_name":"Good","created_at":"x","data_uri":"data:video/webm;base64,AAAA"},
                {"id":"b"},
                {"id":"c","display_name":"","data_uri":"data:video/webm;base64,AAAA"}
            ]}"#,
        )
        .unwrap();

        let store = JsonLibraryStore::with_path(&path);
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name, "Good");
    }

    #[tokio::test]
    async fn legacy_bare_array_still_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(
            &path,
            r#"[{"id":"old","display_name":"Legacy","created_at":"x","data_uri":"data:video/webm;base64,AAAA"}]"#,
        )
        .unwrap();

        let store = JsonLibraryStore::with_path(&path);
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "old");
    }

    #[tokio::test]
    async fn legacy_layout_is_migrated_on_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(
            &path,
            r#"[{"id":"old","display_name":"Legacy","created_at":"x","data_uri":"data:video/webm;base64,AAAA"}]"#,
        )
        .unwrap();

        let store = JsonLibraryStore::with_path(&path);
        store.append(entry("New")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["version"], 1);
        assert_eq!(doc["entries"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unparseable_file_is_corrupt_and_never_clobbered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = JsonLibraryStore::with_path(&path);

        assert!(matches!(
            store.list().await,
            Err(LibraryError::CorruptStore(_))
        ));
        assert!(matches!(
            store.append(entry("X")).await,
            Err(LibraryError::CorruptStore(_))
        ));
        assert!(matches!(
            store.remove("x").await,
            Err(LibraryError::CorruptStore(_))
        ));

        // The broken file is left in place for inspection
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json at all");
    }

    #[tokio::test]
    async fn empty_file_is_empty_library() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "").unwrap();

        let store = JsonLibraryStore::with_path(&path);
        assert!(store.list().await.unwrap().is_empty());
    }
}
