// Dashboard studio - dashboard state store, persistence and auth bridge
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
