use crate::config::{ConfigError, Credentials};
use crate::handlers::{
    AuthToolsHandler, ItemsHandler, SchemaHandler, ServerToolsHandler, UsersHandler,
};
use crate::mcp::catalog::tool_catalog;
use crate::services::api_client::ApiClient;
use crate::services::auth::AuthManager;
use crate::services::dispatcher::{Dispatcher, ToolHandler};
use crate::services::logger::Logger;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub auth: Arc<AuthManager>,
    pub api: Arc<ApiClient>,
    pub dispatcher: Arc<Dispatcher>,
}

impl App {
    pub fn initialize() -> Result<Self, ConfigError> {
        Self::with_credentials(Credentials::from_env()?)
    }

    pub fn with_credentials(credentials: Credentials) -> Result<Self, ConfigError> {
        let logger = Logger::new("baasix");
        let client = reqwest::Client::builder()
            .user_agent(concat!("baasix-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client");

        let auth = Arc::new(AuthManager::new(
            logger.clone(),
            credentials.clone(),
            client.clone(),
        ));
        let api = Arc::new(ApiClient::new(
            logger.clone(),
            auth.clone(),
            client,
            &credentials,
        ));

        let items = Arc::new(ItemsHandler::new(logger.clone(), api.clone()));
        let schema = Arc::new(SchemaHandler::new(logger.clone(), api.clone()));
        let users = Arc::new(UsersHandler::new(logger.clone(), api.clone()));
        let auth_tools = Arc::new(AuthToolsHandler::new(logger.clone(), auth.clone()));
        let server_tools = Arc::new(ServerToolsHandler::new(logger.clone(), api.clone()));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for tool in [
            "list_items",
            "get_item",
            "create_item",
            "update_item",
            "delete_item",
        ] {
            handlers.insert(tool.to_string(), items.clone());
        }
        for tool in [
            "list_collections",
            "get_collection",
            "create_collection",
            "update_collection",
            "delete_collection",
            "list_fields",
            "create_field",
            "update_field",
            "delete_field",
        ] {
            handlers.insert(tool.to_string(), schema.clone());
        }
        for tool in [
            "list_users",
            "get_user",
            "create_user",
            "update_user",
            "delete_user",
        ] {
            handlers.insert(tool.to_string(), users.clone());
        }
        handlers.insert("refresh_token".to_string(), auth_tools);
        for tool in ["server_info", "server_health"] {
            handlers.insert(tool.to_string(), server_tools.clone());
        }

        Self::validate_tool_wiring(&handlers)?;

        let dispatcher = Arc::new(Dispatcher::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            auth,
            api,
            dispatcher,
        })
    }

    /// Every advertised tool must have a handler; anything else is a server
    /// wiring bug caught at startup.
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ConfigError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ConfigError::IncompleteWiring(missing.join(", ")))
    }
}
