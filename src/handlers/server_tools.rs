use crate::errors::ToolError;
use crate::services::api_client::{ApiClient, ProxyRequest};
use crate::services::dispatcher::ToolHandler;
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

pub struct ServerToolsHandler {
    logger: Logger,
    api: Arc<ApiClient>,
}

impl ServerToolsHandler {
    pub fn new(logger: Logger, api: Arc<ApiClient>) -> Self {
        Self {
            logger: logger.child("server"),
            api,
        }
    }
}

#[async_trait]
impl ToolHandler for ServerToolsHandler {
    async fn handle(&self, tool: &str, _args: &Value) -> Result<Value, ToolError> {
        match tool {
            "server_info" => {
                self.api
                    .execute(&ProxyRequest::new(Method::GET, "/server/info"))
                    .await
            }
            "server_health" => {
                self.logger.debug("health probe", None);
                self.api
                    .execute(&ProxyRequest::new(Method::GET, "/server/health").anonymous())
                    .await
            }
            _ => Err(ToolError::internal(format!(
                "unsupported server tool: {}",
                tool
            ))),
        }
    }
}
