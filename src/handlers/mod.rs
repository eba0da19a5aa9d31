mod auth_tools;
mod items;
mod schema;
mod server_tools;
mod users;

pub use auth_tools::AuthToolsHandler;
pub use items::ItemsHandler;
pub use schema::SchemaHandler;
pub use server_tools::ServerToolsHandler;
pub use users::UsersHandler;

use crate::errors::ToolError;
use serde_json::Value;

/// Arguments reach handlers schema-validated, so these guards only fire when
/// a handler is driven outside the dispatcher.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ToolError::invalid_params(format!("{} is required", key)))
}

pub(crate) fn required_object<'a>(args: &'a Value, key: &str) -> Result<&'a Value, ToolError> {
    args.get(key)
        .filter(|v| v.is_object())
        .ok_or_else(|| ToolError::invalid_params(format!("{} must be an object", key)))
}

/// Primary keys may be strings or numbers; anything that would break out of
/// its path segment is rejected.
pub(crate) fn id_segment(args: &Value, key: &str) -> Result<String, ToolError> {
    let raw = match args.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ToolError::invalid_params(format!("{} is required", key))),
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '?', '#', '%']) {
        return Err(ToolError::invalid_params(format!(
            "{} is not a valid identifier",
            key
        )));
    }
    Ok(trimmed.to_string())
}
