use crate::errors::ToolError;
use serde_json::Value;

/// Assembles the backend's listing query string from validated tool
/// arguments: filter (JSON-encoded), sort and fields (comma-joined),
/// page and limit. Returns an empty string when nothing is set.
pub fn list_query(args: &Value) -> Result<String, ToolError> {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Some(filter) = args.get("filter") {
        if !filter.is_null() {
            let encoded = serde_json::to_string(filter)
                .map_err(|err| ToolError::internal(format!("filter not serializable: {}", err)))?;
            pairs.push(("filter", encoded));
        }
    }
    if let Some(joined) = comma_list(args.get("sort")) {
        pairs.push(("sort", joined));
    }
    if let Some(joined) = comma_list(args.get("fields")) {
        pairs.push(("fields", joined));
    }
    if let Some(page) = args.get("page").and_then(|v| v.as_u64()) {
        pairs.push(("page", page.to_string()));
    }
    if let Some(limit) = args.get("limit").and_then(|v| v.as_u64()) {
        pairs.push(("limit", limit.to_string()));
    }

    if pairs.is_empty() {
        return Ok(String::new());
    }
    let encoded = serde_urlencoded::to_string(&pairs)
        .map_err(|err| ToolError::internal(format!("query encoding failed: {}", err)))?;
    Ok(format!("?{}", encoded))
}

fn comma_list(value: Option<&Value>) -> Option<String> {
    let items = value?.as_array()?;
    let joined = items
        .iter()
        .filter_map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
