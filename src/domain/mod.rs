// Domain layer - Core business entities
pub mod auth;
pub mod component;
pub mod container;
pub mod dashboard;
pub mod ids;
pub mod state;
