// ABOUTME: Byte-level checks that a downloaded upload is a usable PDF
// ABOUTME: Structural header/trailer checks with an optional full parse via pdf-extract

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::debug;

pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;
const MARKER_WINDOW: usize = 1024;

pub const MSG_EMPTY: &str = "File PDF kosong";
pub const MSG_NOT_PDF: &str = "File bukan PDF yang valid";
pub const MSG_TRUNCATED: &str = "File PDF terpotong atau rusak";
pub const MSG_TOO_LARGE: &str = "Ukuran file melebihi 10 MB";

/// Decides whether downloaded bytes are an acceptable PDF.
///
/// `Err` carries the message shown on the offending document card.
pub trait PdfValidator: Send + Sync {
    fn validate(&self, name: &str, bytes: &[u8]) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralPdfValidator {
    deep: bool,
}

impl StructuralPdfValidator {
    /// Header, trailer and size checks only
    pub fn shallow() -> Self {
        Self { deep: false }
    }

    /// Also parse the document body
    pub fn deep() -> Self {
        Self { deep: true }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

impl PdfValidator for StructuralPdfValidator {
    fn validate(&self, name: &str, bytes: &[u8]) -> Result<(), String> {
        if bytes.is_empty() {
            return Err(MSG_EMPTY.to_string());
        }
        if bytes.len() > MAX_PDF_BYTES {
            return Err(MSG_TOO_LARGE.to_string());
        }

        let head = &bytes[..bytes.len().min(MARKER_WINDOW)];
        if !contains(head, b"%PDF-") {
            return Err(MSG_NOT_PDF.to_string());
        }
        let tail = &bytes[bytes.len().saturating_sub(MARKER_WINDOW)..];
        if !contains(tail, b"%%EOF") {
            return Err(MSG_TRUNCATED.to_string());
        }

        if self.deep {
            // pdf-extract panics on some malformed inputs
            let parsed = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));
            match parsed {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    debug!("Parsing {} failed: {}", name, e);
                    return Err(MSG_TRUNCATED.to_string());
                }
                Err(_) => {
                    debug!("Parser panicked on {}", name);
                    return Err(MSG_TRUNCATED.to_string());
                }
            }
        }
        Ok(())
    }
}
