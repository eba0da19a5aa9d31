use crate::errors::ToolError;
use crate::handlers::{id_segment, required_object};
use crate::services::api_client::{ApiClient, ProxyRequest};
use crate::services::dispatcher::ToolHandler;
use crate::services::logger::Logger;
use crate::utils::query::list_query;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// CRUD over `/users`.
pub struct UsersHandler {
    logger: Logger,
    api: Arc<ApiClient>,
}

impl UsersHandler {
    pub fn new(logger: Logger, api: Arc<ApiClient>) -> Self {
        Self {
            logger: logger.child("users"),
            api,
        }
    }
}

#[async_trait]
impl ToolHandler for UsersHandler {
    async fn handle(&self, tool: &str, args: &Value) -> Result<Value, ToolError> {
        match tool {
            "list_users" => {
                let query = list_query(args)?;
                self.logger.debug("list", None);
                self.api
                    .execute(&ProxyRequest::new(Method::GET, format!("/users{}", query)))
                    .await
            }
            "get_user" => {
                let id = id_segment(args, "id")?;
                let query = list_query(args)?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::GET,
                        format!("/users/{}{}", id, query),
                    ))
                    .await
            }
            "create_user" => {
                let data = required_object(args, "data")?;
                self.api
                    .execute(&ProxyRequest::new(Method::POST, "/users").with_body(data.clone()))
                    .await
            }
            "update_user" => {
                let id = id_segment(args, "id")?;
                let data = required_object(args, "data")?;
                self.api
                    .execute(
                        &ProxyRequest::new(Method::PUT, format!("/users/{}", id))
                            .with_body(data.clone()),
                    )
                    .await
            }
            "delete_user" => {
                let id = id_segment(args, "id")?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::DELETE,
                        format!("/users/{}", id),
                    ))
                    .await
            }
            _ => Err(ToolError::internal(format!(
                "unsupported users tool: {}",
                tool
            ))),
        }
    }
}
