// ABOUTME: Re-downloads every attached support-document PDF before a create submit
// ABOUTME: Collects per-document failures so the form can highlight the offending cards

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use simlok_form::FormState;

use crate::client::SubmissionClient;
use crate::error::ClientError;
use crate::pdf::{PdfValidator, MAX_PDF_BYTES, MSG_TOO_LARGE};

pub const MSG_DOWNLOAD_FAILED: &str = "Dokumen tidak dapat diunduh, silakan upload ulang";
pub const MSG_VERIFY_FAILED: &str = "Gagal memverifikasi dokumen, silakan upload ulang";

/// Does the upload path end in `.pdf`, ignoring case, query and fragment
pub fn is_pdf_url(value: &str) -> bool {
    let path = value.split(&['?', '#'][..]).next().unwrap_or_default();
    path.to_ascii_lowercase().ends_with(".pdf")
}

/// Failures keyed by document row id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfCheckReport {
    pub checked: usize,
    pub invalid: BTreeMap<String, String>,
}

impl PdfCheckReport {
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }

    /// One line for the aggregate toast
    pub fn summary(&self) -> String {
        format!(
            "{} dokumen PDF tidak valid. Silakan upload ulang dokumen yang ditandai.",
            self.invalid.len()
        )
    }
}

pub struct PdfGate {
    client: SubmissionClient,
    validator: Arc<dyn PdfValidator>,
}

impl PdfGate {
    pub fn new(client: SubmissionClient, validator: Arc<dyn PdfValidator>) -> Self {
        Self { client, validator }
    }

    /// `(row id, upload url)` for every PDF attached to a visible document list
    pub fn targets(state: &FormState) -> Vec<(String, String)> {
        state
            .documents()
            .visible_kinds()
            .into_iter()
            .flat_map(|kind| {
                state
                    .documents()
                    .list(kind)
                    .uploads()
                    .filter(|(_, url)| is_pdf_url(url))
                    .map(|(id, url)| (id.to_string(), url.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Check each attached PDF in turn
    pub async fn check(&self, state: &FormState) -> PdfCheckReport {
        let mut report = PdfCheckReport::default();

        for (id, upload) in Self::targets(state) {
            report.checked += 1;
            if let Err(message) = self.check_one(&upload).await {
                warn!("Document {} failed the PDF check: {}", id, message);
                report.invalid.insert(id, message);
            }
        }

        info!(
            "PDF check finished: {} checked, {} invalid",
            report.checked,
            report.invalid.len()
        );
        report
    }

    async fn check_one(&self, upload: &str) -> Result<(), String> {
        let url: Url = self
            .client
            .resolve(upload)
            .map_err(|_| MSG_VERIFY_FAILED.to_string())?;

        let bytes = match self.client.fetch_bytes(&url, MAX_PDF_BYTES).await {
            Ok(bytes) => bytes,
            Err(ClientError::TooLarge { .. }) => return Err(MSG_TOO_LARGE.to_string()),
            Err(ClientError::Api { status, .. }) => {
                debug!("Download of {} returned {}", url, status);
                return Err(MSG_DOWNLOAD_FAILED.to_string());
            }
            Err(e) => {
                debug!("Download of {} failed: {}", url, e);
                return Err(MSG_VERIFY_FAILED.to_string());
            }
        };

        self.validator.validate(upload, &bytes)
    }
}
