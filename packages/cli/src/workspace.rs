// ABOUTME: The draft the CLI edits, loaded from and written back to the draft directory
// ABOUTME: Resolves row references typed on the command line to row ids

use std::path::Path;
use std::sync::Arc;

use simlok_form::{DraftManager, DraftSession, FileStore, FormState, Notifier};
use tracing::debug;

/// The form being edited across CLI invocations
pub struct DraftWorkspace {
    manager: Arc<DraftManager>,
    pub state: FormState,
}

impl DraftWorkspace {
    /// Open the draft stored under `dir`, or a blank form when none exists.
    ///
    /// A restored draft is announced through `notifier`.
    pub fn open(dir: &Path, notifier: &dyn Notifier) -> Self {
        let manager = Arc::new(DraftManager::new(Arc::new(FileStore::new(dir))));
        let mut state = FormState::new();
        let mut session = DraftSession::new(Arc::clone(&manager));
        if session.restore(&mut state, notifier) {
            debug!("Loaded draft from {}", dir.display());
        } else {
            debug!("No draft under {}, starting blank", dir.display());
        }
        Self { manager, state }
    }

    pub fn manager(&self) -> &Arc<DraftManager> {
        &self.manager
    }

    pub fn save(&self) -> bool {
        self.manager.save(&self.state.to_draft())
    }

    pub fn clear(&mut self) -> bool {
        self.state.reset();
        self.manager.clear()
    }
}

/// Map `2`, `#2` (1-based position) or a literal row id onto a row id
pub fn resolve_row<'a>(ids: impl IntoIterator<Item = &'a str>, reference: &str) -> Option<String> {
    let ids: Vec<&str> = ids.into_iter().collect();
    let reference = reference.trim();

    if let Some(id) = ids.iter().find(|id| **id == reference) {
        return Some(id.to_string());
    }
    let position: usize = reference.trim_start_matches('#').parse().ok()?;
    position
        .checked_sub(1)
        .and_then(|index| ids.get(index))
        .map(|id| id.to_string())
}
