// ABOUTME: Versioned draft snapshot of the submission form and its key-value store
// ABOUTME: Best-effort persistence, every storage failure is logged and swallowed

use crate::notify::{Notifier, Toast};
use crate::state::FormState;
use serde::{Deserialize, Serialize};
use simlok_core::{
    clamp_worker_count, DocumentKind, FormData, SupportDoc, Worker, DRAFT_STORAGE_KEY,
    DRAFT_VERSION,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string store with local-storage semantics
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", file))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        debug!("Reading draft store entry from: {:?}", path);
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if !self.root.exists() {
            debug!("Creating draft directory: {:?}", self.root);
            fs::create_dir_all(&self.root)?;
        }
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items().remove(key);
        Ok(())
    }
}

/// Persisted snapshot envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub v: u32,
    pub form_data: FormData,
    pub workers: Vec<Worker>,
    pub desired_count: usize,
    pub worker_count_input: String,
    #[serde(default)]
    pub show_bulk: bool,
    #[serde(default)]
    pub bulk_names: String,
    #[serde(default)]
    pub simja_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub sika_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub work_order_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub kontrak_kerja_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub jsa_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub hsse_documents: Vec<SupportDoc>,
    #[serde(default)]
    pub visible_optional_docs: Vec<DocumentKind>,
}

impl Draft {
    fn documents_mut(&mut self, kind: DocumentKind) -> &mut Vec<SupportDoc> {
        match kind {
            DocumentKind::Simja => &mut self.simja_documents,
            DocumentKind::Sika => &mut self.sika_documents,
            DocumentKind::WorkOrder => &mut self.work_order_documents,
            DocumentKind::KontrakKerja => &mut self.kontrak_kerja_documents,
            DocumentKind::Jsa => &mut self.jsa_documents,
            DocumentKind::Hsse => &mut self.hsse_documents,
        }
    }
}

impl FormState {
    /// Snapshot every tracked piece of state
    pub fn to_draft(&self) -> Draft {
        let rows = |kind| self.documents.list(kind).rows().to_vec();
        Draft {
            v: DRAFT_VERSION,
            form_data: self.form_data.clone(),
            workers: self.workers.clone(),
            desired_count: self.desired_count,
            worker_count_input: self.worker_count_input.clone(),
            show_bulk: self.show_bulk,
            bulk_names: self.bulk_names.clone(),
            simja_documents: rows(DocumentKind::Simja),
            sika_documents: rows(DocumentKind::Sika),
            work_order_documents: rows(DocumentKind::WorkOrder),
            kontrak_kerja_documents: rows(DocumentKind::KontrakKerja),
            jsa_documents: rows(DocumentKind::Jsa),
            hsse_documents: rows(DocumentKind::Hsse),
            visible_optional_docs: self.documents.visible_optional(),
        }
    }

    /// Replace tracked state with a draft's contents
    pub fn apply_draft(&mut self, mut draft: Draft) {
        for kind in DocumentKind::ALL {
            let rows = std::mem::take(draft.documents_mut(kind));
            self.documents.replace(kind, rows);
        }
        self.documents
            .set_visible_optional(draft.visible_optional_docs);

        self.form_data = draft.form_data;
        self.workers = if draft.workers.is_empty() {
            vec![Worker::new(None)]
        } else {
            draft.workers
        };
        self.desired_count = clamp_worker_count(draft.desired_count as i64);
        self.worker_count_input = draft.worker_count_input;
        self.show_bulk = draft.show_bulk;
        self.bulk_names = draft.bulk_names;
    }
}

/// Reads and writes the draft under a fixed key
pub struct DraftManager {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl DraftManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DRAFT_STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored draft if it exists, parses and carries the current version
    pub fn load(&self) -> Option<Draft> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read draft {}: {}", self.key, e);
                return None;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unparseable draft {}: {}", self.key, e);
                return None;
            }
        };

        let version = value.get("v").and_then(serde_json::Value::as_u64);
        if version != Some(u64::from(DRAFT_VERSION)) {
            debug!(
                "Ignoring draft {} with version {:?}, expected {}",
                self.key, version, DRAFT_VERSION
            );
            return None;
        }

        match serde_json::from_value::<Draft>(value) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("Ignoring malformed draft {}: {}", self.key, e);
                None
            }
        }
    }

    /// Overwrite the stored draft. Returns whether it was written.
    pub fn save(&self, draft: &Draft) -> bool {
        let json = match serde_json::to_string(draft) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize draft: {}", e);
                return false;
            }
        };
        match self.store.set_item(&self.key, &json) {
            Ok(()) => {
                debug!("Saved draft {} ({} workers)", self.key, draft.workers.len());
                true
            }
            Err(e) => {
                error!("Failed to save draft {}: {}", self.key, e);
                false
            }
        }
    }

    /// Delete the stored draft. Returns whether the store accepted the removal.
    pub fn clear(&self) -> bool {
        match self.store.remove_item(&self.key) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to remove draft {}: {}", self.key, e);
                false
            }
        }
    }
}

/// Draft lifecycle for one mounted form
pub struct DraftSession {
    manager: Arc<DraftManager>,
    hydrated: bool,
    restore_notified: bool,
}

impl DraftSession {
    pub fn new(manager: Arc<DraftManager>) -> Self {
        Self {
            manager,
            hydrated: false,
            restore_notified: false,
        }
    }

    pub fn manager(&self) -> &Arc<DraftManager> {
        &self.manager
    }

    /// Hydrate `state` from storage once per session.
    ///
    /// Only the first call reads storage; the "draft restored" toast fires at
    /// most once no matter how often this runs.
    pub fn restore(&mut self, state: &mut FormState, notifier: &dyn Notifier) -> bool {
        if self.hydrated {
            return false;
        }
        self.hydrated = true;

        let Some(draft) = self.manager.load() else {
            return false;
        };
        state.apply_draft(draft);

        if !self.restore_notified {
            self.restore_notified = true;
            notifier.notify(Toast::info(
                "Draft dipulihkan",
                "Data formulir yang belum terkirim telah dipulihkan dari draft.",
            ));
        }
        true
    }

    /// Remove the draft and return the form to its initial shape
    pub fn discard(&self, state: &mut FormState) {
        self.manager.clear();
        state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use pretty_assertions::assert_eq;
    use simlok_core::{DocField, FormField};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn sample_state() -> FormState {
        let mut state = FormState::new();
        state.set_field(FormField::VendorName, "PT Sinar Jaya");
        state.set_field(FormField::ImplementationStartDate, "2025-04-01");
        let first = state.workers()[0].id.clone();
        state.update_worker_name(&first, "Ana");
        state.add_bulk_workers("Budi\nCitra");
        state.set_worker_count_input("7");

        let simja = state.documents().list(DocumentKind::Simja).rows()[0].id.clone();
        state.update_document(DocumentKind::Simja, &simja, DocField::Number, "SIMJA/01");
        state.show_optional_document(DocumentKind::Jsa);
        state
    }

    #[test]
    fn test_draft_round_trip_through_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = sample_state();
        assert!(DraftManager::new(store.clone()).save(&state.to_draft()));

        // fresh manager, as after a reload
        let manager = Arc::new(DraftManager::new(store));
        let mut restored = FormState::new();
        let mut session = DraftSession::new(manager);
        assert!(session.restore(&mut restored, &RecordingNotifier::new()));

        assert_eq!(restored.form_data(), state.form_data());
        assert_eq!(restored.workers(), state.workers());
        assert_eq!(restored.documents(), state.documents());
        assert_eq!(restored.worker_count_input(), "7");
        assert_eq!(restored.desired_count(), 7);
    }

    #[test]
    fn test_draft_with_other_version_ignored() {
        let store = Arc::new(MemoryStore::new());
        let mut draft = sample_state().to_draft();
        draft.v = DRAFT_VERSION + 1;
        store
            .set_item(DRAFT_STORAGE_KEY, &serde_json::to_string(&draft).unwrap())
            .unwrap();

        let manager = DraftManager::new(store);
        assert!(manager.load().is_none());
    }

    #[test]
    fn test_garbage_draft_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(DRAFT_STORAGE_KEY, "{not json").unwrap();
        assert!(DraftManager::new(store.clone()).load().is_none());

        store.set_item(DRAFT_STORAGE_KEY, r#"{"v":1,"workers":"nope"}"#).unwrap();
        assert!(DraftManager::new(store).load().is_none());
    }

    #[test]
    fn test_envelope_uses_camel_case() {
        let json = serde_json::to_value(sample_state().to_draft()).unwrap();
        assert_eq!(json["v"], 1);
        assert!(json.get("formData").is_some());
        assert!(json.get("workerCountInput").is_some());
        assert_eq!(json["visibleOptionalDocs"], serde_json::json!(["JSA"]));
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let manager = DraftManager::new(Arc::new(BrokenStore));
        assert!(manager.load().is_none());
        assert!(!manager.save(&FormState::new().to_draft()));
        assert!(!manager.clear());
    }

    #[test]
    fn test_restore_notifies_once() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let manager = Arc::new(DraftManager::new(store));
        manager.save(&sample_state().to_draft());

        let notifier = RecordingNotifier::new();
        let mut session = DraftSession::new(manager);
        let mut state = FormState::new();
        assert!(session.restore(&mut state, &notifier));
        assert!(!session.restore(&mut state, &notifier));
        assert_eq!(notifier.count(), 1);
        assert_eq!(notifier.toasts()[0].title, "Draft dipulihkan");
    }

    #[test]
    fn test_restore_without_draft() {
        let manager = Arc::new(DraftManager::new(Arc::new(MemoryStore::new())));
        let notifier = RecordingNotifier::new();
        let mut state = FormState::new();
        assert!(!DraftSession::new(manager).restore(&mut state, &notifier));
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn test_discard_clears_store_and_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let manager = Arc::new(DraftManager::new(store.clone()));
        let mut state = sample_state();
        manager.save(&state.to_draft());

        DraftSession::new(manager).discard(&mut state);
        assert!(store.get_item(DRAFT_STORAGE_KEY).unwrap().is_none());
        assert_eq!(state.workers().len(), 1);
        assert!(state.form_data().vendor_name.is_empty());
    }

    #[test]
    fn test_file_store_replaces_without_leftovers() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.set_item(DRAFT_STORAGE_KEY, r#"{"v":1}"#).unwrap();
        store.set_item(DRAFT_STORAGE_KEY, r#"{"v":2}"#).unwrap();
        assert_eq!(
            store.get_item(DRAFT_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"v":2}"#)
        );

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["simlok_submissionFormDraft.v1.json".to_string()]);
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("drafts"));

        assert!(store.get_item(DRAFT_STORAGE_KEY).unwrap().is_none());
        store.set_item(DRAFT_STORAGE_KEY, "{}").unwrap();
        assert_eq!(store.get_item(DRAFT_STORAGE_KEY).unwrap().as_deref(), Some("{}"));
        assert!(store
            .root()
            .join("simlok_submissionFormDraft.v1.json")
            .exists());

        store.remove_item(DRAFT_STORAGE_KEY).unwrap();
        store.remove_item(DRAFT_STORAGE_KEY).unwrap();
        assert!(store.get_item(DRAFT_STORAGE_KEY).unwrap().is_none());
    }
}
