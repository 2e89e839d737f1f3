// ABOUTME: Debounced draft autosave
// ABOUTME: Each change supersedes the pending write; dropping cancels it

use crate::draft::{Draft, DraftManager};
use simlok_core::AUTOSAVE_DEBOUNCE;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct DraftAutosaver {
    manager: Arc<DraftManager>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DraftAutosaver {
    pub fn new(manager: Arc<DraftManager>) -> Self {
        Self::with_delay(manager, AUTOSAVE_DEBOUNCE)
    }

    pub fn with_delay(manager: Arc<DraftManager>, delay: Duration) -> Self {
        Self {
            manager,
            delay,
            pending: None,
        }
    }

    /// Write `draft` once `delay` passes without another call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, draft: Draft) {
        self.cancel();
        let manager = Arc::clone(&self.manager);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            manager.save(&draft);
        }));
    }

    /// Drop the pending write, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending draft save");
            }
            handle.abort();
        }
    }

    /// Write immediately, replacing any pending write
    pub fn flush(&mut self, draft: &Draft) -> bool {
        self.cancel();
        self.manager.save(draft)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DraftAutosaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{KeyValueStore, MemoryStore};
    use crate::state::FormState;
    use simlok_core::{FormField, DRAFT_STORAGE_KEY};

    fn setup() -> (Arc<MemoryStore>, DraftAutosaver) {
        let store = Arc::new(MemoryStore::new());
        let manager = Arc::new(DraftManager::new(store.clone()));
        (store, DraftAutosaver::new(manager))
    }

    fn stored(store: &MemoryStore) -> Option<Draft> {
        store
            .get_item(DRAFT_STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_waits_for_debounce() {
        let (store, mut autosaver) = setup();
        autosaver.schedule(FormState::new().to_draft());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(stored(&store).is_none());
        assert!(autosaver.is_pending());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(stored(&store).is_some());
        assert!(!autosaver.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_change_wins() {
        let (store, mut autosaver) = setup();
        let mut state = FormState::new();

        state.set_field(FormField::VendorName, "PT A");
        autosaver.schedule(state.to_draft());
        tokio::time::sleep(Duration::from_millis(300)).await;

        state.set_field(FormField::VendorName, "PT B");
        autosaver.schedule(state.to_draft());
        tokio::time::sleep(Duration::from_millis(300)).await;
        // first timer would have fired by now
        assert!(stored(&store).is_none());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(stored(&store).unwrap().form_data.vendor_name, "PT B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_save() {
        let (store, mut autosaver) = setup();
        autosaver.schedule(FormState::new().to_draft());
        drop(autosaver);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(stored(&store).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_now() {
        let (store, mut autosaver) = setup();
        autosaver.schedule(FormState::new().to_draft());

        let mut state = FormState::new();
        state.set_field(FormField::WorkLocation, "Area Kilang");
        assert!(autosaver.flush(&state.to_draft()));
        assert_eq!(stored(&store).unwrap().form_data.work_location, "Area Kilang");

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(stored(&store).unwrap().form_data.work_location, "Area Kilang");
    }
}
