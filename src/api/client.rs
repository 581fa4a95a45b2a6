use anyhow::Result;
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ApiResponse, ClientError};
use crate::config::ApiConfig;

/// HTTP wrapper around the backend's JSON API.
///
/// Every call unwraps the `{data, message?, success}` envelope and maps
/// failures onto [`ClientError`]. Holds no state beyond the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&cfg.user_agent)?);
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Client for `base_url` with default timeout and user agent
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.get(self.url(path));
        self.send(Method::GET, path, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(Method::POST, path, request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, request).await
    }

    /// DELETE; any 2xx counts as success and the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        debug!(method = "DELETE", path, "api request");
        let resp = self.client.delete(self.url(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status, path, &body));
        }
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        debug!(method = %method, path, "api request");
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            debug!(method = %method, path, status = status.as_u16(), "api error response");
            return Err(ClientError::from_response(status, path, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        envelope.into_result()
    }
}
