//! Request and response models for the SIMLOK submissions API

use serde::{Deserialize, Serialize};
use simlok_core::{null_as_default, ApprovalStatus, DocumentKind, FormData, SupportDoc, Worker};
use simlok_form::FormState;

/// Worker as sent to the server (client row ids stay local)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPayload {
    pub worker_name: String,
    pub worker_photo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsse_pass_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsse_pass_valid_thru: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsse_pass_document_upload: Option<String>,
}

impl From<&Worker> for WorkerPayload {
    fn from(worker: &Worker) -> Self {
        Self {
            worker_name: worker.worker_name.trim().to_string(),
            worker_photo: worker.worker_photo.clone(),
            hsse_pass_number: worker.hsse_pass_number.clone(),
            hsse_pass_valid_thru: worker.hsse_pass_valid_thru.clone(),
            hsse_pass_document_upload: worker.hsse_pass_document_upload.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
    pub document_number: String,
    pub document_date: String,
    pub document_upload: String,
}

impl From<SupportDoc> for DocumentPayload {
    fn from(doc: SupportDoc) -> Self {
        Self {
            document_subtype: doc.document_subtype,
            document_number: doc.document_number.trim().to_string(),
            document_date: doc.document_date,
            document_upload: doc.document_upload,
        }
    }
}

/// Body of `POST /api/submissions` and `PUT /api/submissions/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub form: FormData,
    /// Legacy newline separated roster
    pub worker_names: String,
    pub worker_count: usize,
    pub workers: Vec<WorkerPayload>,
    pub simja_documents: Vec<DocumentPayload>,
    pub sika_documents: Vec<DocumentPayload>,
    pub work_order_documents: Vec<DocumentPayload>,
    pub kontrak_kerja_documents: Vec<DocumentPayload>,
    pub jsa_documents: Vec<DocumentPayload>,
    pub hsse_documents: Vec<DocumentPayload>,
}

impl SubmissionPayload {
    /// Payload from validated state. Only fully filled document rows are sent.
    pub fn from_state(state: &FormState) -> Self {
        let docs = |kind| -> Vec<DocumentPayload> {
            state
                .documents()
                .filled(kind)
                .into_iter()
                .map(DocumentPayload::from)
                .collect()
        };
        Self {
            form: state.form_data().clone(),
            worker_names: state.worker_names(),
            worker_count: state.workers().len(),
            workers: state.workers().iter().map(WorkerPayload::from).collect(),
            simja_documents: docs(DocumentKind::Simja),
            sika_documents: docs(DocumentKind::Sika),
            work_order_documents: docs(DocumentKind::WorkOrder),
            kontrak_kerja_documents: docs(DocumentKind::KontrakKerja),
            jsa_documents: docs(DocumentKind::Jsa),
            hsse_documents: docs(DocumentKind::Hsse),
        }
    }
}

/// Support document as stored by the server
#[derive(Debug, Clone, Deserialize)]
pub struct SupportDocumentRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub document_type: DocumentKind,
    #[serde(default)]
    pub document_subtype: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_upload: String,
}

impl SupportDocumentRecord {
    pub fn into_row(self) -> SupportDoc {
        let mut row = SupportDoc::new(self.document_type);
        if self.document_subtype.is_some() {
            row.document_subtype = self.document_subtype;
        }
        row.document_number = self.document_number;
        row.document_date = normalize_date(&self.document_date);
        row.document_upload = self.document_upload;
        row
    }
}

/// Stored submission as returned by `GET /api/submissions/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub simlok_number: Option<String>,
    /// Legacy roster for submissions stored before structured workers
    #[serde(default)]
    pub worker_names: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub support_documents: Vec<SupportDocumentRecord>,
    #[serde(flatten)]
    pub form: FormData,
}

impl SubmissionRecord {
    /// Rows grouped per kind in a stable order
    pub fn documents_by_kind(&self) -> Vec<(DocumentKind, Vec<SupportDoc>)> {
        DocumentKind::ALL
            .into_iter()
            .map(|kind| {
                let rows = self
                    .support_documents
                    .iter()
                    .filter(|doc| doc.document_type == kind)
                    .cloned()
                    .map(SupportDocumentRecord::into_row)
                    .collect();
                (kind, rows)
            })
            .collect()
    }

    /// Rows rebuilt from the legacy newline separated roster
    pub fn legacy_workers(&self) -> Vec<Worker> {
        self.worker_names
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Worker::new(Some(name)))
            .collect()
    }

    /// Dates arrive as ISO timestamps; the form works in `YYYY-MM-DD`
    pub fn normalized_form(&self) -> FormData {
        let mut form = self.form.clone();
        form.implementation_start_date = normalize_date(&form.implementation_start_date);
        form.implementation_end_date = normalize_date(&form.implementation_end_date);
        form
    }
}

/// `GET /api/submissions/{id}` body, wrapped or bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SubmissionResponse {
    Wrapped { submission: SubmissionRecord },
    Bare(SubmissionRecord),
}

impl SubmissionResponse {
    pub fn into_record(self) -> SubmissionRecord {
        match self {
            SubmissionResponse::Wrapped { submission } => submission,
            SubmissionResponse::Bare(record) => record,
        }
    }
}

/// Worker as stored by the server
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub worker_name: String,
    #[serde(default)]
    pub worker_photo: Option<String>,
    #[serde(default)]
    pub hsse_pass_number: Option<String>,
    #[serde(default)]
    pub hsse_pass_valid_thru: Option<String>,
    #[serde(default)]
    pub hsse_pass_document_upload: Option<String>,
}

impl WorkerRecord {
    /// Form row with a fresh client id
    pub fn into_worker(self) -> Worker {
        let mut worker = Worker::new(Some(&self.worker_name));
        worker.worker_photo = self.worker_photo.unwrap_or_default();
        worker.hsse_pass_number = self.hsse_pass_number.filter(|s| !s.is_empty());
        worker.hsse_pass_valid_thru = self
            .hsse_pass_valid_thru
            .map(|d| normalize_date(&d))
            .filter(|s| !s.is_empty());
        worker.hsse_pass_document_upload =
            self.hsse_pass_document_upload.filter(|s| !s.is_empty());
        worker
    }
}

/// `GET /api/submissions/{id}/workers` body
#[derive(Debug, Deserialize)]
pub struct WorkersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub workers: Vec<WorkerRecord>,
}

/// Error body of any non-2xx response
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Result of a successful create or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub submission_id: Option<String>,
    /// Page the user is sent to afterwards
    pub redirect_to: String,
}

pub const SUBMISSIONS_PAGE: &str = "/vendor/submissions";

/// Keep the `YYYY-MM-DD` prefix of an ISO date or timestamp
pub fn normalize_date(value: &str) -> String {
    let value = value.trim();
    match value.get(..10) {
        Some(prefix) if simlok_core::parse_form_date(prefix).is_some() => prefix.to_string(),
        _ => value.to_string(),
    }
}
