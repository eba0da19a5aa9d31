use crate::errors::ToolError;
use crate::handlers::{id_segment, required_object, required_str};
use crate::services::api_client::{ApiClient, ProxyRequest};
use crate::services::dispatcher::ToolHandler;
use crate::services::logger::Logger;
use crate::utils::query::list_query;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// CRUD over `/items/{collection}`.
pub struct ItemsHandler {
    logger: Logger,
    api: Arc<ApiClient>,
}

impl ItemsHandler {
    pub fn new(logger: Logger, api: Arc<ApiClient>) -> Self {
        Self {
            logger: logger.child("items"),
            api,
        }
    }

    async fn list(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let query = list_query(args)?;
        self.logger.debug("list", Some(&Value::String(collection.to_string())));
        self.api
            .execute(&ProxyRequest::new(
                Method::GET,
                format!("/items/{}{}", collection, query),
            ))
            .await
    }

    async fn get(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let id = id_segment(args, "id")?;
        let query = list_query(args)?;
        self.api
            .execute(&ProxyRequest::new(
                Method::GET,
                format!("/items/{}/{}{}", collection, id, query),
            ))
            .await
    }

    async fn create(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let data = required_object(args, "data")?;
        self.api
            .execute(
                &ProxyRequest::new(Method::POST, format!("/items/{}", collection))
                    .with_body(data.clone()),
            )
            .await
    }

    async fn update(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let id = id_segment(args, "id")?;
        let data = required_object(args, "data")?;
        self.api
            .execute(
                &ProxyRequest::new(Method::PUT, format!("/items/{}/{}", collection, id))
                    .with_body(data.clone()),
            )
            .await
    }

    async fn delete(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let id = id_segment(args, "id")?;
        self.api
            .execute(&ProxyRequest::new(
                Method::DELETE,
                format!("/items/{}/{}", collection, id),
            ))
            .await
    }
}

#[async_trait]
impl ToolHandler for ItemsHandler {
    async fn handle(&self, tool: &str, args: &Value) -> Result<Value, ToolError> {
        match tool {
            "list_items" => self.list(args).await,
            "get_item" => self.get(args).await,
            "create_item" => self.create(args).await,
            "update_item" => self.update(args).await,
            "delete_item" => self.delete(args).await,
            _ => Err(ToolError::internal(format!("unsupported items tool: {}", tool))),
        }
    }
}
