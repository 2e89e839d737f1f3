// ABOUTME: Page-level submit flow: validate, verify PDFs, send, clear the draft
// ABOUTME: Guards against double submission with an atomic in-flight flag

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use simlok_form::{DraftManager, FormState, Notifier, Toast, ValidationFailure, Validator};

use crate::api::{SubmissionPayload, SubmitReceipt, SUBMISSIONS_PAGE};
use crate::client::SubmissionClient;
use crate::error::ClientError;
use crate::pdf::PdfValidator;
use crate::pdf_gate::{PdfCheckReport, PdfGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmitReceipt),
    /// A submit was already in flight; nothing was sent
    Ignored,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("PDF check failed: {}", .0.summary())]
    PdfCheck(PdfCheckReport),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SubmitError {
    /// Text suitable for a toast or error banner
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(failure) => failure.message.clone(),
            SubmitError::PdfCheck(report) => report.summary(),
            SubmitError::Client(err) => err.user_message(),
        }
    }

    /// Row ids to highlight after a failed PDF check
    pub fn invalid_documents(&self) -> Option<&PdfCheckReport> {
        match self {
            SubmitError::PdfCheck(report) => Some(report),
            _ => None,
        }
    }
}

/// Clears the in-flight flag when the submit ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SubmitController {
    client: SubmissionClient,
    validator: Validator,
    pdf_gate: PdfGate,
    drafts: Arc<DraftManager>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
}

impl SubmitController {
    pub fn new(
        client: SubmissionClient,
        pdf_validator: Arc<dyn PdfValidator>,
        drafts: Arc<DraftManager>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            pdf_gate: PdfGate::new(client.clone(), pdf_validator),
            client,
            validator: Validator::submission(),
            drafts,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// True while a submit is between its first check and its response
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        state: &FormState,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome, SubmitError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit already in flight, ignoring");
            return Ok(SubmitOutcome::Ignored);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if let Err(failure) = self.validator.run(state) {
            warn!("Submission rejected by {}: {}", failure.check, failure.message);
            self.notifier
                .notify(Toast::error("Validasi gagal", failure.message.clone()));
            return Err(failure.into());
        }

        if mode == SubmitMode::Create {
            let report = self.pdf_gate.check(state).await;
            if !report.is_ok() {
                self.notifier
                    .notify(Toast::error("Dokumen tidak valid", report.summary()));
                return Err(SubmitError::PdfCheck(report));
            }
        }

        let payload = SubmissionPayload::from_state(state);
        let sent = match &mode {
            SubmitMode::Create => self.client.create_submission(&payload).await,
            SubmitMode::Update { id } => self.client.update_submission(id, &payload).await,
        };
        let body = match sent {
            Ok(body) => body,
            Err(err) => {
                error!("Submitting failed: {}", err);
                self.notifier
                    .notify(Toast::error("Gagal mengirim pengajuan", err.user_message()));
                return Err(err.into());
            }
        };

        self.drafts.clear();
        let submission_id = match &mode {
            SubmitMode::Create => submission_id(&body),
            SubmitMode::Update { id } => Some(id.clone()),
        };
        info!("Submission sent: {:?}", submission_id);

        let message = match mode {
            SubmitMode::Create => "Pengajuan SIMLOK berhasil dikirim",
            SubmitMode::Update { .. } => "Pengajuan SIMLOK berhasil diperbarui",
        };
        self.notifier.notify(Toast::success("Berhasil", message));

        Ok(SubmitOutcome::Submitted(SubmitReceipt {
            submission_id,
            redirect_to: SUBMISSIONS_PAGE.to_string(),
        }))
    }

    /// Submit and return the form to its initial shape on success
    pub async fn submit_and_reset(
        &self,
        state: &mut FormState,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome, SubmitError> {
        let outcome = self.submit(state, mode).await?;
        if matches!(outcome, SubmitOutcome::Submitted(_)) {
            state.reset();
        }
        Ok(outcome)
    }

    /// Send a revised submission back to the review queue
    pub async fn resubmit(&self, id: &str) -> Result<(), SubmitError> {
        match self.client.resubmit(id).await {
            Ok(_) => {
                self.notifier.notify(Toast::success(
                    "Berhasil",
                    "Pengajuan dikirim ulang untuk ditinjau",
                ));
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .notify(Toast::error("Gagal mengirim ulang", err.user_message()));
                Err(err.into())
            }
        }
    }
}

fn submission_id(body: &Value) -> Option<String> {
    body.get("submission")
        .and_then(|s| s.get("id"))
        .or_else(|| body.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
