use crate::config::Credentials;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Owns the mutable token cache and produces a currently valid bearer token
/// on demand.
///
/// Resolution order: explicit token (never expires, never refreshed), then a
/// cached login token that has not passed its expiry, then a fresh login
/// exchange. The cache sits behind an async mutex that stays held across the
/// login call, so concurrent callers that both observe a stale token await
/// one shared exchange instead of issuing duplicate logins.
pub struct AuthManager {
    logger: Logger,
    credentials: Credentials,
    client: Client,
    cache: Mutex<Option<CachedToken>>,
}

impl AuthManager {
    pub fn new(logger: Logger, credentials: Credentials, client: Client) -> Self {
        Self {
            logger: logger.child("auth"),
            credentials,
            client,
            cache: Mutex::new(None),
        }
    }

    pub fn uses_explicit_token(&self) -> bool {
        self.credentials.has_explicit_token()
    }

    /// Whether an invalid credential can be replaced by a new login exchange.
    pub fn can_refresh(&self) -> bool {
        !self.uses_explicit_token() && self.credentials.has_login()
    }

    pub async fn token(&self) -> Result<String, ToolError> {
        if let Some(token) = self.credentials.token.as_deref() {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if Utc::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        if !self.credentials.has_login() {
            return Err(ToolError::auth("no authentication method available"));
        }

        let value = self.login().await?;
        let expires_at = Utc::now() + Duration::seconds(token_ttl_secs());
        self.logger.debug(
            "cached fresh token",
            Some(&serde_json::json!({ "expires_at": expires_at.to_rfc3339() })),
        );
        *cache = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    /// Clears the cached token unconditionally. A no-op in explicit-token
    /// mode, where there is never anything cached.
    pub async fn invalidate(&self) {
        if self.uses_explicit_token() {
            self.logger.debug("invalidate ignored for explicit token", None);
            return;
        }
        *self.cache.lock().await = None;
    }

    pub async fn force_refresh(&self) -> Result<String, ToolError> {
        self.invalidate().await;
        self.token().await
    }

    async fn login(&self) -> Result<String, ToolError> {
        let email = self
            .credentials
            .email
            .as_deref()
            .ok_or_else(|| ToolError::auth("no authentication method available"))?;
        let password = self
            .credentials
            .password
            .as_deref()
            .ok_or_else(|| ToolError::auth("no authentication method available"))?;

        let url = format!("{}/auth/login", self.credentials.base());
        self.logger.debug("login exchange", None);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| ToolError::auth(format!("login request failed: {}", err)))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let upstream = extract_error_message(&body)
                .unwrap_or_else(|| format!("login rejected ({})", status.as_u16()));
            return Err(ToolError::auth(upstream));
        }

        let token = body
            .get("token")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        if token.is_empty() {
            return Err(ToolError::auth("login response did not include a token"));
        }
        Ok(token)
    }

    #[cfg(test)]
    pub(crate) async fn seed_cache(&self, value: &str, expires_at: DateTime<Utc>) {
        *self.cache.lock().await = Some(CachedToken {
            value: value.to_string(),
            expires_at,
        });
    }
}

fn token_ttl_secs() -> i64 {
    std::env::var("BAASIX_TOKEN_TTL_SECS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS)
}

pub(crate) fn extract_error_message(body: &Value) -> Option<String> {
    let errors = body.get("errors").and_then(|v| v.as_array())?;
    let joined = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join("; ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
