//! HTTP surface: router, handlers, validation, shared types.

pub mod handlers;
pub mod server;
pub mod server_config;
pub mod types;
pub mod validators;
