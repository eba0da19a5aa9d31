pub mod api_client;
pub mod auth;
pub mod dispatcher;
pub mod logger;
