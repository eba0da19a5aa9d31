use crate::config::Credentials;
use crate::errors::ToolError;
use crate::services::auth::{extract_error_message, AuthManager};
use crate::services::logger::Logger;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// One outbound REST call against the backend. Endpoints carry a leading
/// slash and any query string already assembled by the handler.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
    pub extra_headers: Option<HeaderMap>,
    pub anonymous: bool,
}

impl ProxyRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            extra_headers: None,
            anonymous: false,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Skip credential attach. Only for endpoints the backend serves
    /// anonymously.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// Executes proxy requests with the bearer credential supplied by the
/// auth manager. A 401 in email/password mode invalidates the cached token
/// and retries the identical request exactly once with a fresh one; a second
/// 401 is surfaced as-is, never retried again.
pub struct ApiClient {
    logger: Logger,
    auth: Arc<AuthManager>,
    client: Client,
    base: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(
        logger: Logger,
        auth: Arc<AuthManager>,
        client: Client,
        credentials: &Credentials,
    ) -> Self {
        let timeout_ms = std::env::var("BAASIX_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self {
            logger: logger.child("http"),
            auth,
            client,
            base: credentials.base(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub async fn execute(&self, request: &ProxyRequest) -> Result<Value, ToolError> {
        let token = if request.anonymous {
            None
        } else {
            Some(self.auth.token().await?)
        };

        let (status, body) = self.send_once(request, token.as_deref()).await?;
        if status == StatusCode::UNAUTHORIZED && !request.anonymous && self.auth.can_refresh() {
            self.logger.debug(
                "credential rejected, refreshing once",
                Some(&serde_json::json!({ "endpoint": request.endpoint })),
            );
            let fresh = self.auth.force_refresh().await?;
            let (status, body) = self.send_once(request, Some(&fresh)).await?;
            return into_result(status, body);
        }
        into_result(status, body)
    }

    async fn send_once(
        &self,
        request: &ProxyRequest,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value), ToolError> {
        let url = format!("{}{}", self.base, request.endpoint);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(headers) = &request.extra_headers {
            builder = builder.headers(headers.clone());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| {
                ToolError::internal(format!("request to {} timed out", request.endpoint))
            })??;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok((status, body))
    }
}

fn into_result(status: StatusCode, body: Value) -> Result<Value, ToolError> {
    if status.is_success() {
        return Ok(body);
    }
    let message = extract_error_message(&body)
        .unwrap_or_else(|| format!("Baasix request failed ({})", status.as_u16()));
    Err(ToolError::api(status.as_u16(), message))
}
