//! SIMLOK API client
//!
//! Typed access to the SIMLOK submissions API, the PDF integrity gate run
//! before a create submit, and the submit controller that ties the form
//! engine to the network.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod pdf;
pub mod pdf_gate;
pub mod submit;

// Re-export commonly used types
pub use api::{SubmissionPayload, SubmissionRecord, SubmitReceipt, WorkerRecord};
pub use client::SubmissionClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult};
pub use hydrate::{load_for_edit, EditForm};
pub use pdf::{PdfValidator, StructuralPdfValidator};
pub use pdf_gate::{is_pdf_url, PdfCheckReport, PdfGate};
pub use submit::{SubmitController, SubmitError, SubmitMode, SubmitOutcome};
