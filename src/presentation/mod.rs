// Presentation layer - HTTP API for the view layer
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
