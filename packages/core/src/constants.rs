use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Current schema version of the persisted form draft
pub const DRAFT_VERSION: u32 = 1;

/// Storage key holding the serialized draft envelope
pub const DRAFT_STORAGE_KEY: &str = "simlok:submissionFormDraft.v1";

/// Delay between the last tracked change and the draft being written
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Bounds for the declared worker count
pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 9999;

/// Subtype every new SIMJA row starts with
pub const SIMJA_DEFAULT_SUBTYPE: &str = "Ast. Man. Facility Management";

/// Hazard categories a SIKA document may be issued under
pub const SIKA_SUBTYPES: &[&str] = &[
    "Pekerjaan Dingin",
    "Pekerjaan Panas",
    "Confined Space",
    "Working at Height",
    "Penggalian",
    "Pekerjaan Listrik",
];

/// Get the path to the SIMLOK directory (~/.simlok)
pub fn simlok_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".simlok")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".simlok")
    }
}

/// Default directory for locally stored drafts (~/.simlok/drafts)
pub fn drafts_dir() -> PathBuf {
    simlok_dir().join("drafts")
}
