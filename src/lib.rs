pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod mcp;
pub mod services;
pub mod utils;
