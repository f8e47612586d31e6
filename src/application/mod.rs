// Application layer - State store, commands and use cases
pub mod auth_service;
pub mod auth_session;
pub mod command;
pub mod container_manager;
pub mod dashboard_manager;
pub mod endpoint_client;
pub mod endpoint_service;
pub mod reducer;
pub mod store;
pub mod store_backend;
