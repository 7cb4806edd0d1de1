use crate::config::ApiConfig;
use crate::model::ApiResponse;
use anyhow::{anyhow, Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

/// Shared HTTP client for the backend REST API.
///
/// One `reqwest::Client` with a base URL and timeout; every call logs the
/// request, branches non-success status codes into diagnostic categories,
/// and decodes the uniform `ApiResponse` envelope.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(path, self.http.get(self.url(path))).await
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(path, self.http.get(self.url(path)).query(query))
            .await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(path, self.http.post(self.url(path)).json(body))
            .await
    }

    /// POST and return the raw response body (export downloads).
    pub(crate) async fn post_bytes<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>> {
        debug!(path, "Sending API request");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed to send", path))?;

        let status = response.status();
        if !status.is_success() {
            log_status_failure(status, path);
            return Err(anyhow!("Request to {} failed with status {}", path, status));
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))?;
        Ok(bytes.to_vec())
    }

    /// POST expecting an acknowledgement with no data payload.
    pub(crate) async fn post_ack(&self, path: &str) -> Result<()> {
        self.execute_ack(path, self.http.post(self.url(path))).await
    }

    pub(crate) async fn put_json_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.execute_ack(path, self.http.put(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn post_json_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.execute_ack(path, self.http.post(self.url(path)).json(body))
            .await
    }

    pub(crate) async fn delete_ack(&self, path: &str) -> Result<()> {
        self.execute_ack(path, self.http.delete(self.url(path)))
            .await
    }

    // Send, branch on status, decode through the ApiResponse envelope, and
    // require a data payload.
    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let parsed: ApiResponse<T> = self.roundtrip(path, request).await?;
        let data = check_success(parsed, path)?;
        data.ok_or_else(|| anyhow!("Response from {} carried no data", path))
    }

    // Like `execute`, but a success envelope without data is fine.
    async fn execute_ack(&self, path: &str, request: RequestBuilder) -> Result<()> {
        let parsed: ApiResponse<serde_json::Value> = self.roundtrip(path, request).await?;
        check_success(parsed, path).map(|_| ())
    }

    async fn roundtrip<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        debug!(path, "Sending API request");
        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed to send", path))?;

        let status = response.status();
        if !status.is_success() {
            log_status_failure(status, path);
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Request to {} failed with status {}: {}",
                path,
                status,
                body
            ));
        }
        debug!(path, status = status.as_u16(), "API response received");

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response body from {}", path))
    }
}

fn check_success<T>(parsed: ApiResponse<T>, path: &str) -> Result<Option<T>> {
    if parsed.success {
        return Ok(parsed.data);
    }
    let detail = parsed
        .error
        .map(|e| format!("{}: {}", e.code, e.message))
        .or(parsed.message)
        .unwrap_or_else(|| "unspecified error".to_string());
    error!(path, %detail, "Backend rejected request");
    Err(anyhow!("Request to {} rejected: {}", path, detail))
}

/// Map failure status codes to diagnostic log categories. Diagnostics only;
/// no retry or backoff is applied at this layer.
fn log_status_failure(status: StatusCode, path: &str) {
    match status.as_u16() {
        401 => error!(path, "Unauthorized access"),
        403 => error!(path, "Access forbidden"),
        404 => error!(path, "Requested resource not found"),
        500 => error!(path, "Backend internal error"),
        code => error!(path, code, "Request failed"),
    }
}
