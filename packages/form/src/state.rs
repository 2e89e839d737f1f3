// ABOUTME: In-memory state of the submission form
// ABOUTME: Worker roster reconciliation against the declared worker count

use crate::documents::DocumentLists;
use simlok_core::{
    clamp_worker_count, DocField, DocumentKind, FormData, FormField, SupportDoc, Worker,
    WorkerField,
};

/// Everything the submission form tracks between edits.
///
/// `worker_count_input` (raw text), `desired_count` (last valid number) and
/// the actual number of worker rows may disagree while the user is editing.
/// Rows are only added or dropped by explicit actions, never as a side
/// effect of typing into the count field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub(crate) form_data: FormData,
    pub(crate) workers: Vec<Worker>,
    pub(crate) desired_count: usize,
    pub(crate) worker_count_input: String,
    pub(crate) show_bulk: bool,
    pub(crate) bulk_names: String,
    pub(crate) documents: DocumentLists,
    pending_focus: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Initial shape: one blank worker, one blank SIMJA and SIKA row
    pub fn new() -> Self {
        Self {
            form_data: FormData::default(),
            workers: vec![Worker::new(None)],
            desired_count: 1,
            worker_count_input: "1".to_string(),
            show_bulk: false,
            bulk_names: String::new(),
            documents: DocumentLists::new(),
            pending_focus: None,
        }
    }

    /// Build state for editing an already stored submission
    pub fn hydrate(
        form_data: FormData,
        workers: Vec<Worker>,
        documents: impl IntoIterator<Item = (DocumentKind, Vec<SupportDoc>)>,
    ) -> Self {
        let mut state = Self::new();
        state.form_data = form_data;
        if !workers.is_empty() {
            state.workers = workers;
        }
        state.sync_count_to_rows();

        let mut visible = Vec::new();
        for (kind, rows) in documents {
            if !kind.is_required() && !rows.is_empty() {
                visible.push(kind);
            }
            state.documents.replace(kind, rows);
        }
        state.documents.set_visible_optional(visible);
        state
    }

    /// Back to the initial shape
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn field(&self, field: FormField) -> &str {
        self.form_data.get(field)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form_data.set(field, value);
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    pub fn desired_count(&self) -> usize {
        self.desired_count
    }

    pub fn worker_count_input(&self) -> &str {
        &self.worker_count_input
    }

    pub fn show_bulk(&self) -> bool {
        self.show_bulk
    }

    pub fn bulk_names(&self) -> &str {
        &self.bulk_names
    }

    pub fn documents(&self) -> &DocumentLists {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentLists {
        &mut self.documents
    }

    /// Id of the row whose name input should receive focus next, consumed once
    pub fn take_pending_focus(&mut self) -> Option<String> {
        self.pending_focus.take()
    }

    /// Declared count and row count disagree
    pub fn count_mismatch(&self) -> bool {
        let rows = self.workers.len();
        match parse_count(&self.worker_count_input) {
            Some(typed) => typed != rows as i64 || self.desired_count != rows,
            None => self.desired_count != rows,
        }
    }

    fn sync_count_to_rows(&mut self) {
        self.desired_count = self.workers.len();
        self.worker_count_input = self.desired_count.to_string();
    }

    fn set_desired(&mut self, desired: usize) {
        self.desired_count = clamp_worker_count(desired as i64);
        self.worker_count_input = self.desired_count.to_string();
    }

    /// Append one row. The declared count follows.
    pub fn add_worker(&mut self, preset_name: Option<&str>) -> String {
        let worker = Worker::new(preset_name);
        let id = worker.id.clone();
        self.workers.push(worker);
        self.set_desired(self.desired_count + 1);
        self.pending_focus = Some(id.clone());
        id
    }

    /// Remove a row unless it is the only one
    pub fn remove_worker(&mut self, id: &str) -> bool {
        if self.workers.len() <= 1 {
            return false;
        }
        let before = self.workers.len();
        self.workers.retain(|w| w.id != id);
        if self.workers.len() == before {
            return false;
        }
        self.sync_count_to_rows();
        true
    }

    pub fn update_worker(&mut self, id: &str, field: WorkerField, value: impl Into<String>) -> bool {
        match self.workers.iter_mut().find(|w| w.id == id) {
            Some(worker) => {
                worker.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn update_worker_name(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.update_worker(id, WorkerField::Name, value)
    }

    pub fn update_worker_photo(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.update_worker(id, WorkerField::Photo, value)
    }

    pub fn update_worker_hsse_number(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.update_worker(id, WorkerField::HsseNumber, value)
    }

    pub fn update_worker_hsse_valid_thru(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.update_worker(id, WorkerField::HsseValidThru, value)
    }

    pub fn update_worker_hsse_document(&mut self, id: &str, value: impl Into<String>) -> bool {
        self.update_worker(id, WorkerField::HsseDocument, value)
    }

    /// Record what the user typed into the count field. Never resizes.
    pub fn set_worker_count_input(&mut self, text: impl Into<String>) {
        self.worker_count_input = text.into();
        if let Some(typed) = parse_count(&self.worker_count_input) {
            if typed > 0 {
                self.desired_count = clamp_worker_count(typed);
            }
        }
    }

    /// Resize the roster to the declared count ("Sesuaikan").
    ///
    /// Empty or unparseable input keeps the current length. New rows are
    /// appended blank and the first of them gets focus; extra rows are cut
    /// from the tail.
    pub fn apply_desired_count(&mut self) -> usize {
        let current = self.workers.len();
        let target = match parse_count(&self.worker_count_input) {
            Some(typed) => clamp_worker_count(typed),
            None => current,
        };

        if target > current {
            let fresh: Vec<Worker> = (current..target).map(|_| Worker::new(None)).collect();
            self.pending_focus = fresh.first().map(|w| w.id.clone());
            self.workers.extend(fresh);
        } else if target < current {
            self.workers.truncate(target);
        }

        self.sync_count_to_rows();
        self.workers.len()
    }

    pub fn toggle_bulk(&mut self, open: bool) {
        self.show_bulk = open;
    }

    pub fn set_bulk_names(&mut self, text: impl Into<String>) {
        self.bulk_names = text.into();
    }

    /// Append one row per non-blank line of `text`
    pub fn add_bulk_workers(&mut self, text: &str) -> usize {
        let names: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if names.is_empty() {
            return 0;
        }

        let added = names.len();
        self.workers
            .extend(names.into_iter().map(|name| Worker::new(Some(name))));
        self.set_desired(self.desired_count + added);
        self.bulk_names.clear();
        self.show_bulk = false;
        added
    }

    /// Newline separated names for the legacy `worker_names` field
    pub fn worker_names(&self) -> String {
        self.workers
            .iter()
            .map(|w| w.worker_name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn add_document(&mut self, kind: DocumentKind) -> String {
        self.documents.list_mut(kind).add()
    }

    pub fn remove_document(&mut self, kind: DocumentKind, id: &str) -> bool {
        self.documents.list_mut(kind).remove(id)
    }

    pub fn update_document(
        &mut self,
        kind: DocumentKind,
        id: &str,
        field: DocField,
        value: impl Into<String>,
    ) -> bool {
        self.documents.list_mut(kind).update(id, field, value)
    }

    pub fn show_optional_document(&mut self, kind: DocumentKind) -> bool {
        self.documents.show(kind)
    }

    pub fn hide_optional_document(&mut self, kind: DocumentKind) -> bool {
        self.documents.hide(kind)
    }
}

fn parse_count(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}
