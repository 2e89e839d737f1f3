// ABOUTME: Submission form engine for SIMLOK permits
// ABOUTME: Roster/document reconciliation, draft persistence and pre-submit validation

pub mod autosave;
pub mod documents;
pub mod draft;
pub mod notify;
pub mod state;
pub mod validation;

pub use autosave::DraftAutosaver;
pub use documents::{DocumentList, DocumentLists};
pub use draft::{
    Draft, DraftManager, DraftSession, FileStore, KeyValueStore, MemoryStore, StorageError,
    StorageResult,
};
pub use notify::{Notifier, RecordingNotifier, Toast, ToastLevel, TracingNotifier};
pub use state::FormState;
pub use validation::{Check, CheckResult, ValidationFailure, Validator};
