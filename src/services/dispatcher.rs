use crate::errors::{ErrorCode, McpError, ToolError, ToolErrorKind};
use crate::mcp::catalog::{tool_by_name, tool_names, validate_tool_args};
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, tool: &str, args: &Value) -> Result<Value, ToolError>;
}

/// Routes one invocation through lookup, schema validation and the handler,
/// and is the only place internal errors are translated to protocol errors.
/// Stateless across invocations; no deduplication, no idempotency guarantee.
pub struct Dispatcher {
    logger: Logger,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl Dispatcher {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("dispatch"),
            handlers,
        }
    }

    pub fn has_handler(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub async fn dispatch(&self, tool: &str, args: &Value) -> Result<Value, McpError> {
        let Some(def) = tool_by_name(tool) else {
            let close = suggest(tool, &tool_names(), 3);
            let message = if close.is_empty() {
                format!("unknown tool: {}", tool)
            } else {
                format!("unknown tool: {} (did you mean: {})", tool, close.join(", "))
            };
            return Err(McpError::method_not_found(message));
        };

        validate_tool_args(&def.name, args)?;

        let handler = self.handlers.get(&def.name).ok_or_else(|| {
            McpError::internal(format!("no handler registered for {}", def.name))
        })?;

        self.logger.debug(&def.name, None);
        match handler.handle(&def.name, args).await {
            Ok(result) => success_envelope(&result),
            Err(err) => {
                self.logger.error(
                    &format!("{} failed", def.name),
                    Some(&serde_json::json!({
                        "kind": err.kind,
                        "status": err.status,
                        "message": err.message,
                    })),
                );
                let code = match err.kind {
                    ToolErrorKind::InvalidParams => ErrorCode::InvalidParams,
                    _ => ErrorCode::InternalError,
                };
                Err(McpError::new(code, err.message))
            }
        }
    }
}

fn success_envelope(result: &Value) -> Result<Value, McpError> {
    let text = serde_json::to_string(result)
        .map_err(|err| McpError::internal(format!("result not serializable: {}", err)))?;
    Ok(serde_json::json!({
        "content": [ { "type": "text", "text": text } ]
    }))
}
