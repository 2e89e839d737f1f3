use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const SIMLOK_BASE_URL: &str = "SIMLOK_BASE_URL";
pub const SIMLOK_TIMEOUT_SECS: &str = "SIMLOK_TIMEOUT_SECS";
pub const SIMLOK_DRAFT_DIR: &str = "SIMLOK_DRAFT_DIR";
pub const SIMLOK_QR_SECRET: &str = "SIMLOK_QR_SECRET";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL {0}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(#[from] ParseIntError),
    #[error("Timeout must be at least 1 second")]
    TimeoutOutOfRange,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the SIMLOK web app; API paths and relative uploads resolve against it
    pub base_url: Url,
    pub timeout: Duration,
    pub draft_dir: PathBuf,
    pub qr_secret: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            draft_dir: simlok_core::drafts_dir(),
            qr_secret: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env::var(SIMLOK_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::InvalidBaseUrl(raw_url.clone(), e))?;

        let timeout_secs = match env::var(SIMLOK_TIMEOUT_SECS) {
            Ok(value) => value.trim().parse::<u64>()?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::TimeoutOutOfRange);
        }

        let draft_dir = env::var(SIMLOK_DRAFT_DIR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(simlok_core::drafts_dir);

        let qr_secret = env::var(SIMLOK_QR_SECRET).ok().filter(|s| !s.is_empty());

        Ok(ClientConfig {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            draft_dir,
            qr_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [SIMLOK_BASE_URL, SIMLOK_TIMEOUT_SECS, SIMLOK_DRAFT_DIR, SIMLOK_QR_SECRET] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear();
        let config = ClientConfig::from_env().unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.draft_dir.ends_with(".simlok/drafts"));
        assert!(config.qr_secret.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom() {
        clear();
        env::set_var(SIMLOK_BASE_URL, "https://simlok.example.co.id");
        env::set_var(SIMLOK_TIMEOUT_SECS, "5");
        env::set_var(SIMLOK_DRAFT_DIR, "/tmp/simlok-drafts");
        env::set_var(SIMLOK_QR_SECRET, "s3cret");

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url.host_str(), Some("simlok.example.co.id"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.draft_dir, PathBuf::from("/tmp/simlok-drafts"));
        assert_eq!(config.qr_secret.as_deref(), Some("s3cret"));
        clear();
    }

    #[test]
    #[serial]
    fn test_config_invalid_values() {
        clear();
        env::set_var(SIMLOK_BASE_URL, "not a url");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::InvalidBaseUrl(..))
        ));

        clear();
        env::set_var(SIMLOK_TIMEOUT_SECS, "0");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::TimeoutOutOfRange)
        ));

        env::set_var(SIMLOK_TIMEOUT_SECS, "soon");
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::InvalidTimeout(_))
        ));
        clear();
    }
}
