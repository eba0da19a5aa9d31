#![allow(dead_code)]

use baasix_mcp::app::App;
use baasix_mcp::config::Credentials;
use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

pub fn credentials(base_url: &str) -> Credentials {
    Credentials::new(Url::parse(base_url).expect("valid base url"))
}

pub fn app_with_login(base_url: &str) -> App {
    App::with_credentials(credentials(base_url).with_login("a@b.com", "x"))
        .expect("app initializes")
}

/// Unwraps the `{content: [{type: "text", text}]}` envelope back into JSON.
pub fn content_json(envelope: &Value) -> Value {
    let text = envelope["content"][0]["text"]
        .as_str()
        .expect("text content");
    serde_json::from_str(text).expect("text content is JSON")
}
