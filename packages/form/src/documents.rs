// ABOUTME: Per-kind support document lists (SIMJA, SIKA and optional kinds)
// ABOUTME: By-id row CRUD with a minimum of one row per list

use simlok_core::{DocField, DocumentKind, SupportDoc};
use std::collections::BTreeSet;

/// Rows for a single document kind. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentList {
    kind: DocumentKind,
    rows: Vec<SupportDoc>,
}

impl DocumentList {
    /// List holding one placeholder row
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            rows: vec![SupportDoc::new(kind)],
        }
    }

    /// Adopt existing rows, seeding a placeholder if there are none
    pub fn from_rows(kind: DocumentKind, rows: Vec<SupportDoc>) -> Self {
        if rows.is_empty() {
            return Self::new(kind);
        }
        Self { kind, rows }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn rows(&self) -> &[SupportDoc] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SupportDoc> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Append a placeholder row and return its id
    pub fn add(&mut self) -> String {
        let row = SupportDoc::new(self.kind);
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Remove a row; the last remaining row is kept
    pub fn remove(&mut self, id: &str) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn update(&mut self, id: &str, field: DocField, value: impl Into<String>) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Rows with every required field present
    pub fn filled_rows(&self) -> Vec<SupportDoc> {
        self.rows
            .iter()
            .filter(|row| row.is_filled(self.kind))
            .cloned()
            .collect()
    }

    pub fn has_filled_row(&self) -> bool {
        self.rows.iter().any(|row| row.is_filled(self.kind))
    }

    /// Rows whose uploads should be verified before sending
    pub fn uploads(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows
            .iter()
            .filter(|row| !row.document_upload.trim().is_empty())
            .map(|row| (row.id.as_str(), row.document_upload.as_str()))
    }
}

/// Every document list of a submission plus which optional kinds are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLists {
    simja: DocumentList,
    sika: DocumentList,
    work_order: DocumentList,
    kontrak_kerja: DocumentList,
    jsa: DocumentList,
    hsse: DocumentList,
    visible_optional: BTreeSet<DocumentKind>,
}

impl Default for DocumentLists {
    fn default() -> Self {
        Self {
            simja: DocumentList::new(DocumentKind::Simja),
            sika: DocumentList::new(DocumentKind::Sika),
            work_order: DocumentList::new(DocumentKind::WorkOrder),
            kontrak_kerja: DocumentList::new(DocumentKind::KontrakKerja),
            jsa: DocumentList::new(DocumentKind::Jsa),
            hsse: DocumentList::new(DocumentKind::Hsse),
            visible_optional: BTreeSet::new(),
        }
    }
}

impl DocumentLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, kind: DocumentKind) -> &DocumentList {
        match kind {
            DocumentKind::Simja => &self.simja,
            DocumentKind::Sika => &self.sika,
            DocumentKind::WorkOrder => &self.work_order,
            DocumentKind::KontrakKerja => &self.kontrak_kerja,
            DocumentKind::Jsa => &self.jsa,
            DocumentKind::Hsse => &self.hsse,
        }
    }

    pub fn list_mut(&mut self, kind: DocumentKind) -> &mut DocumentList {
        match kind {
            DocumentKind::Simja => &mut self.simja,
            DocumentKind::Sika => &mut self.sika,
            DocumentKind::WorkOrder => &mut self.work_order,
            DocumentKind::KontrakKerja => &mut self.kontrak_kerja,
            DocumentKind::Jsa => &mut self.jsa,
            DocumentKind::Hsse => &mut self.hsse,
        }
    }

    /// Replace a list wholesale, e.g. while hydrating
    pub fn replace(&mut self, kind: DocumentKind, rows: Vec<SupportDoc>) {
        *self.list_mut(kind) = DocumentList::from_rows(kind, rows);
    }

    /// Required kinds are always visible
    pub fn is_visible(&self, kind: DocumentKind) -> bool {
        kind.is_required() || self.visible_optional.contains(&kind)
    }

    pub fn visible_kinds(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| self.is_visible(*kind))
            .collect()
    }

    pub fn visible_optional(&self) -> Vec<DocumentKind> {
        self.visible_optional.iter().copied().collect()
    }

    /// Reveal an optional kind with a fresh placeholder row
    pub fn show(&mut self, kind: DocumentKind) -> bool {
        if kind.is_required() || self.visible_optional.contains(&kind) {
            return false;
        }
        *self.list_mut(kind) = DocumentList::new(kind);
        self.visible_optional.insert(kind)
    }

    /// Drop an optional kind and whatever it held
    pub fn hide(&mut self, kind: DocumentKind) -> bool {
        if !self.visible_optional.remove(&kind) {
            return false;
        }
        *self.list_mut(kind) = DocumentList::new(kind);
        true
    }

    pub(crate) fn set_visible_optional(&mut self, kinds: impl IntoIterator<Item = DocumentKind>) {
        self.visible_optional = kinds.into_iter().filter(|k| !k.is_required()).collect();
    }

    /// Filled rows of a kind, or nothing if the kind is hidden
    pub fn filled(&self, kind: DocumentKind) -> Vec<SupportDoc> {
        if !self.is_visible(kind) {
            return Vec::new();
        }
        self.list(kind).filled_rows()
    }
}
