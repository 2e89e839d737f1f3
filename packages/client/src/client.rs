use bytes::{Bytes, BytesMut};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::api::{
    ApiErrorBody, SubmissionPayload, SubmissionRecord, SubmissionResponse, WorkerRecord,
    WorkersResponse,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the SIMLOK submissions API
#[derive(Clone)]
pub struct SubmissionClient {
    http_client: Client,
    base_url: Url,
}

impl SubmissionClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path or a stored upload URL against the page origin
    pub fn resolve(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// `/api/submissions/{id}` plus any trailing segments, each percent-encoded
    pub fn submission_url(&self, id: &str, trailing: &[&str]) -> ClientResult<Url> {
        let id = id.trim();
        if id.is_empty() || id == "." || id == ".." {
            return Err(ClientError::InvalidUrl(format!("invalid submission id '{}'", id)));
        }
        let mut url = self.resolve("/api/submissions")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(id)
            .extend(trailing);
        Ok(url)
    }

    /// `POST /api/submissions`
    pub async fn create_submission(&self, payload: &SubmissionPayload) -> ClientResult<Value> {
        let url = self.resolve("/api/submissions")?;
        debug!("Creating submission at {}", url);

        let response = self.http_client.post(url).json(payload).send().await?;
        Self::parse_json(response).await
    }

    /// `PUT /api/submissions/{id}`
    pub async fn update_submission(
        &self,
        id: &str,
        payload: &SubmissionPayload,
    ) -> ClientResult<Value> {
        let url = self.submission_url(id, &[])?;
        debug!("Updating submission {}", id);

        let response = self.http_client.put(url).json(payload).send().await?;
        Self::parse_json(response).await
    }

    /// `PATCH /api/submissions/{id}/resubmit`
    pub async fn resubmit(&self, id: &str) -> ClientResult<Value> {
        let url = self.submission_url(id, &["resubmit"])?;
        debug!("Resubmitting submission {}", id);

        let response = self.http_client.patch(url).send().await?;
        Self::parse_json(response).await
    }

    /// `GET /api/submissions/{id}`
    pub async fn get_submission(&self, id: &str) -> ClientResult<SubmissionRecord> {
        let url = self.submission_url(id, &[])?;
        let response = self.http_client.get(url).send().await?;
        let body: SubmissionResponse = Self::parse_json(response).await?;
        Ok(body.into_record())
    }

    /// `GET /api/submissions/{id}/workers`
    pub async fn get_workers(&self, id: &str) -> ClientResult<Vec<WorkerRecord>> {
        let url = self.submission_url(id, &["workers"])?;
        let response = self.http_client.get(url).send().await?;
        let body: WorkersResponse = Self::parse_json(response).await?;
        Ok(body.workers)
    }

    /// Download a stored file of at most `max_bytes`.
    ///
    /// Non-2xx statuses become `ClientError::Api`. The body is read chunk by
    /// chunk and abandoned with `ClientError::TooLarge` once it passes the limit.
    pub async fn fetch_bytes(&self, url: &Url, max_bytes: usize) -> ClientResult<Bytes> {
        let mut response = self.http_client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Fetching {} returned {}", url, status);
            return Err(ClientError::api(status.as_u16(), status.to_string()));
        }

        if let Some(length) = response.content_length() {
            if length > max_bytes as u64 {
                debug!("{} announces {} bytes, limit is {}", url, length, max_bytes);
                return Err(ClientError::TooLarge { limit: max_bytes });
            }
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > max_bytes {
                debug!("{} exceeded {} bytes while streaming", url, max_bytes);
                return Err(ClientError::TooLarge { limit: max_bytes });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            let body = if text.trim().is_empty() { "null" } else { &text };
            return Ok(serde_json::from_str(body)?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_default();
        warn!("API request failed with {}: {}", status, message);
        Err(ClientError::api(status.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SubmissionClient {
        SubmissionClient::new(&ClientConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_submission_url_encodes_id() {
        let client = client("http://h/");

        assert_eq!(
            client.submission_url("sub-7", &[]).unwrap().as_str(),
            "http://h/api/submissions/sub-7"
        );
        assert_eq!(
            client.submission_url("sub-7", &["resubmit"]).unwrap().as_str(),
            "http://h/api/submissions/sub-7/resubmit"
        );

        let url = client.submission_url("abc#frag", &[]).unwrap();
        assert_eq!(url.path(), "/api/submissions/abc%23frag");
        assert!(url.fragment().is_none());

        let url = client.submission_url("a?x=1", &[]).unwrap();
        assert_eq!(url.path(), "/api/submissions/a%3Fx=1");
        assert!(url.query().is_none());

        let url = client.submission_url("../../admin", &["workers"]).unwrap();
        assert_eq!(url.path(), "/api/submissions/..%2F..%2Fadmin/workers");

        assert!(client.submission_url("..", &[]).is_err());
        assert!(client.submission_url("  ", &[]).is_err());
    }

    #[tokio::test]
    async fn test_fetch_bytes_enforces_limit() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/f/big.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'%'; 64]))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let url = client.resolve("/f/big.pdf").unwrap();

        let bytes = client.fetch_bytes(&url, 64).await.unwrap();
        assert_eq!(bytes.len(), 64);

        let err = client.fetch_bytes(&url, 63).await.unwrap_err();
        assert!(matches!(err, ClientError::TooLarge { limit: 63 }));
    }

    #[test]
    fn test_resolve_relative_uploads() {
        let config = ClientConfig::new(Url::parse("https://simlok.example.co.id/vendor/").unwrap());
        let client = SubmissionClient::new(&config).unwrap();

        assert_eq!(
            client.resolve("/api/files/a.pdf").unwrap().as_str(),
            "https://simlok.example.co.id/api/files/a.pdf"
        );
        assert_eq!(
            client.resolve("https://cdn.example.com/b.pdf").unwrap().as_str(),
            "https://cdn.example.com/b.pdf"
        );
    }
}
