// ABOUTME: Signed token embedded in the QR code of an issued SIMLOK
// ABOUTME: HMAC-SHA256 over the submission id and issue timestamp

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const QR_PREFIX: &str = "SIMLOK";
const QR_VERSION: &str = "v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QrError {
    #[error("Malformed QR string")]
    Malformed,

    #[error("Unsupported QR version: {0}")]
    UnsupportedVersion(String),

    #[error("QR signature does not match")]
    InvalidSignature,

    #[error("QR signing key cannot be empty")]
    EmptySecret,
}

/// Decoded contents of a verified QR token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub submission_id: String,
    pub issued_at: DateTime<Utc>,
}

fn signer(secret: &[u8]) -> Result<HmacSha256, QrError> {
    if secret.is_empty() {
        return Err(QrError::EmptySecret);
    }
    HmacSha256::new_from_slice(secret).map_err(|_| QrError::EmptySecret)
}

/// Encode `SIMLOK:v1:{id}:{unix_ts}:{hex signature}`
pub fn generate_qr_string(
    submission_id: &str,
    issued_at: DateTime<Utc>,
    secret: &[u8],
) -> Result<String, QrError> {
    if submission_id.is_empty() || submission_id.contains(':') {
        return Err(QrError::Malformed);
    }
    let timestamp = issued_at.timestamp();
    let mut mac = signer(secret)?;
    mac.update(format!("{}:{}", submission_id, timestamp).as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(format!(
        "{}:{}:{}:{}:{}",
        QR_PREFIX, QR_VERSION, submission_id, timestamp, signature
    ))
}

/// Verify and decode a scanned QR string
pub fn parse_qr_string(text: &str, secret: &[u8]) -> Result<QrPayload, QrError> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let [prefix, version, submission_id, timestamp, signature] = parts.as_slice() else {
        return Err(QrError::Malformed);
    };

    if *prefix != QR_PREFIX || submission_id.is_empty() {
        return Err(QrError::Malformed);
    }
    if *version != QR_VERSION {
        return Err(QrError::UnsupportedVersion(version.to_string()));
    }

    let seconds: i64 = timestamp.parse().map_err(|_| QrError::Malformed)?;
    let issued_at = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or(QrError::Malformed)?;
    let signature = hex::decode(signature).map_err(|_| QrError::Malformed)?;

    let mut mac = signer(secret)?;
    mac.update(format!("{}:{}", submission_id, seconds).as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| QrError::InvalidSignature)?;

    Ok(QrPayload {
        submission_id: submission_id.to_string(),
        issued_at,
    })
}
