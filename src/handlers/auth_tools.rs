use crate::errors::ToolError;
use crate::services::auth::AuthManager;
use crate::services::dispatcher::ToolHandler;
use crate::services::logger::Logger;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Credential lifecycle operations that never leave the proxy.
pub struct AuthToolsHandler {
    logger: Logger,
    auth: Arc<AuthManager>,
}

impl AuthToolsHandler {
    pub fn new(logger: Logger, auth: Arc<AuthManager>) -> Self {
        Self {
            logger: logger.child("auth-tools"),
            auth,
        }
    }
}

#[async_trait]
impl ToolHandler for AuthToolsHandler {
    async fn handle(&self, tool: &str, _args: &Value) -> Result<Value, ToolError> {
        match tool {
            "refresh_token" => {
                if self.auth.uses_explicit_token() {
                    // Reported as a no-op, not an error.
                    return Ok(serde_json::json!({
                        "refreshed": false,
                        "reason": "explicit token configured; nothing to refresh"
                    }));
                }
                self.logger.info("forced token refresh", None);
                self.auth.force_refresh().await?;
                Ok(serde_json::json!({ "refreshed": true }))
            }
            _ => Err(ToolError::internal(format!(
                "unsupported auth tool: {}",
                tool
            ))),
        }
    }
}
