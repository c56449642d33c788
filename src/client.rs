//! Cloud Foundry API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{CfError, Result};
use crate::job::{JobHandle, JobStatus, JobStatusFetcher};
use crate::models::{JobResource, JobV3};
use crate::operations::MutationResponse;

const USER_AGENT: &str = concat!("cfops/", env!("CARGO_PKG_VERSION"));

/// Low-level Cloud Foundry API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `List` and `Delete` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use cfops::CfClient;
///
/// # async fn example() -> cfops::Result<()> {
/// // Create from environment variables
/// let client = CfClient::from_env()?;
///
/// // Or configure manually
/// let client = CfClient::new("access-token", "https://api.run.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CfClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for CfClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CfClient {
    /// Create a client from environment variables.
    ///
    /// Uses `CF_API_URL` for the API endpoint and `CF_ACCESS_TOKEN` as the
    /// bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("CF_API_URL").map_err(|_| {
            CfError::ConfigMissing("CF_API_URL environment variable not set".to_string())
        })?;
        let token = env::var("CF_ACCESS_TOKEN").map_err(|_| {
            CfError::ConfigMissing("CF_ACCESS_TOKEN environment variable not set".to_string())
        })?;

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - OAuth access token, without the `bearer` prefix
    /// * `base_url` - API endpoint (e.g., `https://api.run.example.com`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(CfError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(CfError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(CfError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a DELETE request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn delete_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(CfError::HttpError)?;

        Self::check_response(response).await
    }

    /// Make a DELETE request that the platform may run as a job.
    ///
    /// `202 Accepted` yields the job to wait on; any other success status
    /// means the resource is already gone.
    pub async fn delete_async<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<MutationResponse<()>> {
        let response = self.delete_with_query(path, query).await?;

        if response.status() != StatusCode::ACCEPTED {
            return Ok(MutationResponse::Immediate(()));
        }

        let handle = Self::accepted_job(response).await?;
        tracing::debug!(job_id = %handle.id, "delete accepted as job");
        Ok(MutationResponse::Accepted(handle))
    }

    /// Extract the job from a `202 Accepted` response.
    ///
    /// v3 endpoints point at the job with a `Location` header; v2 endpoints
    /// return the job resource as the body.
    async fn accepted_job(response: Response) -> Result<JobHandle> {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        if let Some(id) = location {
            return Ok(JobHandle::new(id));
        }

        let job: JobResource = response.json().await?;
        Ok(JobHandle::new(job.metadata.guid))
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(CfError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let (message, error_code) = Self::extract_error(response, status).await;
        Err(CfError::ApiError {
            message,
            status_code: Some(status.as_u16()),
            error_code,
        })
    }

    /// Extract the error message and code from a failed response.
    ///
    /// Understands the v2 body (`description`, `error_code`) and the v3
    /// body (`errors[0].detail`, `errors[0].title`).
    async fn extract_error(response: Response, status: StatusCode) -> (String, Option<String>) {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return (format!("HTTP {status}"), None),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(description) = json.get("description").and_then(|m| m.as_str()) {
                let code = json
                    .get("error_code")
                    .and_then(|c| c.as_str())
                    .map(str::to_string);
                return (description.to_string(), code);
            }
            if let Some(first) = json.get("errors").and_then(|e| e.get(0)) {
                let detail = first.get("detail").and_then(|d| d.as_str());
                let title = first
                    .get("title")
                    .and_then(|t| t.as_str())
                    .map(str::to_string);
                if let Some(detail) = detail {
                    return (detail.to_string(), title);
                }
            }
        }

        if body.is_empty() {
            return (format!("HTTP {status}"), None);
        }
        (body, None)
    }
}

/// Polls v2 jobs (`GET /v2/jobs/{guid}`).
#[async_trait]
impl JobStatusFetcher for CfClient {
    #[tracing::instrument(skip(self))]
    async fn get_status(&self, job_id: &str) -> Result<JobStatus> {
        let path = format!("v2/jobs/{}", urlencoding::encode(job_id));
        let response = self.get(&path).await?;
        let job: JobResource = response.json().await?;
        Ok(job.entity.into())
    }
}

/// Polls v3 jobs (`GET /v3/jobs/{guid}`) with the wrapped client.
#[derive(Debug, Clone)]
pub struct JobsV3(pub CfClient);

#[async_trait]
impl JobStatusFetcher for JobsV3 {
    #[tracing::instrument(skip(self))]
    async fn get_status(&self, job_id: &str) -> Result<JobStatus> {
        let path = format!("v3/jobs/{}", urlencoding::encode(job_id));
        let response = self.0.get(&path).await?;
        let job: JobV3 = response.json().await?;
        Ok(job.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = CfClient::new("test-token", "https://api.example.com").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("CfClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = CfClient::new("token", "https://api.example.com").unwrap();
        let client2 = CfClient::new("token", "https://api.example.com/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = CfClient::new("token", "not a url").unwrap_err();
        assert!(matches!(err, CfError::UrlError(_)));
    }
}
