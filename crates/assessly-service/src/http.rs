use std::time::Duration;

use assessly_core::{Query, RecommendResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{RecommendService, ServiceError};

/// Async HTTP client implementation of RecommendService.
/// Connects to a running recommendation service.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Like `new`, but every request gives up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("build client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        handle_response(resp).await
    }
}

#[async_trait]
impl RecommendService for HttpService {
    /// Health endpoint is unauthenticated and returns `{"status": "healthy"}`.
    async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    async fn recommend(&self, query: &Query) -> Result<RecommendResponse, ServiceError> {
        debug!(chars = query.as_str().chars().count(), "POST /recommend");
        self.post_json("/recommend", &query.to_request()).await
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

/// Error bodies carry their message in `detail` (or `error`). A body that is
/// not JSON at all means something other than the service answered, so it
/// is reported as `Internal` whatever the status.
async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let value = match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => value,
        Err(e) => return ServiceError::Internal(format!("{status}: json decode: {e}: {body}")),
    };
    let msg = value["detail"]
        .as_str()
        .or_else(|| value["error"].as_str())
        .map(String::from)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Rejected {
            status: status.as_u16(),
            message: msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let svc = HttpService::new("https://recommend.example.com/");
        assert_eq!(svc.base_url(), "https://recommend.example.com");
    }

    #[test]
    fn timeout_client_keeps_base_url() {
        let svc =
            HttpService::with_timeout("http://127.0.0.1:9//", Duration::from_secs(5)).unwrap();
        assert_eq!(svc.base_url(), "http://127.0.0.1:9");
    }
}
