// ABOUTME: Core types and utilities for SIMLOK site entry permits
// ABOUTME: Foundational package shared by the form engine, API client and CLI

pub mod constants;
pub mod qr;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{
    ApprovalStatus, DocField, DocumentKind, FormData, FormField, SupportDoc, UnknownField,
    Worker, WorkerField,
};

// Re-export constants
pub use constants::{
    drafts_dir, simlok_dir, AUTOSAVE_DEBOUNCE, DRAFT_STORAGE_KEY, DRAFT_VERSION, MAX_WORKERS,
    MIN_WORKERS, SIKA_SUBTYPES, SIMJA_DEFAULT_SUBTYPE,
};

// Re-export utilities
pub use utils::{
    clamp_worker_count, generate_row_id, null_as_default, parse_form_date,
    range_includes_weekend,
};

pub use qr::{generate_qr_string, parse_qr_string, QrError, QrPayload};
