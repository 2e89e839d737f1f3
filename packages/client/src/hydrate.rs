use simlok_core::ApprovalStatus;
use simlok_form::FormState;
use tracing::{info, warn};

use crate::api::WorkerRecord;
use crate::client::SubmissionClient;
use crate::error::ClientResult;

/// A stored submission loaded into an editable form
#[derive(Debug, Clone)]
pub struct EditForm {
    pub submission_id: String,
    pub approval_status: ApprovalStatus,
    pub simlok_number: Option<String>,
    pub state: FormState,
}

/// Fetch a submission and its workers and build the edit form.
///
/// A failing workers endpoint falls back to the legacy `worker_names` roster.
pub async fn load_for_edit(client: &SubmissionClient, id: &str) -> ClientResult<EditForm> {
    let record = client.get_submission(id).await?;

    let workers = match client.get_workers(id).await {
        Ok(rows) => rows.into_iter().map(WorkerRecord::into_worker).collect(),
        Err(e) => {
            warn!("Could not load workers for {}: {}", id, e);
            Vec::new()
        }
    };
    let workers = if workers.is_empty() {
        record.legacy_workers()
    } else {
        workers
    };

    let state = FormState::hydrate(record.normalized_form(), workers, record.documents_by_kind());
    info!(
        "Loaded submission {} for editing ({} workers)",
        record.id,
        state.workers().len()
    );

    Ok(EditForm {
        submission_id: record.id,
        approval_status: record.approval_status,
        simlok_number: record.simlok_number,
        state,
    })
}
