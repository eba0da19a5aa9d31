use crate::errors::ToolError;
use crate::handlers::required_str;
use crate::services::api_client::{ApiClient, ProxyRequest};
use crate::services::dispatcher::ToolHandler;
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// Collection and field definitions under `/schemas/{collection}`.
pub struct SchemaHandler {
    logger: Logger,
    api: Arc<ApiClient>,
}

impl SchemaHandler {
    pub fn new(logger: Logger, api: Arc<ApiClient>) -> Self {
        Self {
            logger: logger.child("schema"),
            api,
        }
    }

    async fn create_collection(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let mut body = serde_json::json!({ "collection": collection });
        if let Some(schema) = args.get("schema").filter(|v| v.is_object()) {
            body["schema"] = schema.clone();
        }
        self.logger.debug("create_collection", Some(&Value::String(collection.to_string())));
        self.api
            .execute(
                &ProxyRequest::new(Method::POST, format!("/schemas/{}", collection))
                    .with_body(body),
            )
            .await
    }

    async fn update_collection(&self, args: &Value) -> Result<Value, ToolError> {
        let collection = required_str(args, "collection")?;
        let schema = args
            .get("schema")
            .filter(|v| v.is_object())
            .ok_or_else(|| ToolError::invalid_params("schema must be an object"))?;
        self.api
            .execute(
                &ProxyRequest::new(Method::PUT, format!("/schemas/{}", collection))
                    .with_body(schema.clone()),
            )
            .await
    }

    fn field_request(&self, args: &Value) -> Result<(String, String), ToolError> {
        let collection = required_str(args, "collection")?.to_string();
        let field = required_str(args, "field")?.to_string();
        Ok((collection, field))
    }

    async fn create_field(&self, args: &Value) -> Result<Value, ToolError> {
        let (collection, field) = self.field_request(args)?;
        let field_type = required_str(args, "type")?;
        let mut body = serde_json::json!({ "field": field, "type": field_type });
        if let Some(options) = args.get("options").filter(|v| v.is_object()) {
            body["options"] = options.clone();
        }
        self.api
            .execute(
                &ProxyRequest::new(Method::POST, format!("/schemas/{}/fields", collection))
                    .with_body(body),
            )
            .await
    }

    async fn update_field(&self, args: &Value) -> Result<Value, ToolError> {
        let (collection, field) = self.field_request(args)?;
        let options = args
            .get("options")
            .filter(|v| v.is_object())
            .ok_or_else(|| ToolError::invalid_params("options must be an object"))?;
        self.api
            .execute(
                &ProxyRequest::new(
                    Method::PUT,
                    format!("/schemas/{}/fields/{}", collection, field),
                )
                .with_body(options.clone()),
            )
            .await
    }
}

#[async_trait]
impl ToolHandler for SchemaHandler {
    async fn handle(&self, tool: &str, args: &Value) -> Result<Value, ToolError> {
        match tool {
            "list_collections" => {
                self.api
                    .execute(&ProxyRequest::new(Method::GET, "/schemas"))
                    .await
            }
            "get_collection" => {
                let collection = required_str(args, "collection")?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::GET,
                        format!("/schemas/{}", collection),
                    ))
                    .await
            }
            "create_collection" => self.create_collection(args).await,
            "update_collection" => self.update_collection(args).await,
            "delete_collection" => {
                let collection = required_str(args, "collection")?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::DELETE,
                        format!("/schemas/{}", collection),
                    ))
                    .await
            }
            "list_fields" => {
                let collection = required_str(args, "collection")?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::GET,
                        format!("/schemas/{}/fields", collection),
                    ))
                    .await
            }
            "create_field" => self.create_field(args).await,
            "update_field" => self.update_field(args).await,
            "delete_field" => {
                let (collection, field) = self.field_request(args)?;
                self.api
                    .execute(&ProxyRequest::new(
                        Method::DELETE,
                        format!("/schemas/{}/fields/{}", collection, field),
                    ))
                    .await
            }
            _ => Err(ToolError::internal(format!(
                "unsupported schema tool: {}",
                tool
            ))),
        }
    }
}
