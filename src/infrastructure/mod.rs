// Infrastructure layer - External dependencies and adapters
pub mod auth_callback;
pub mod browser;
pub mod config;
pub mod http_endpoint_client;
pub mod json_file_store;
pub mod memory_store;
