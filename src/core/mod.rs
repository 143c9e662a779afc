// src/core/mod.rs
//! Shared configuration and HTTP plumbing used by the server and the admin tool

pub mod config_manager;
pub mod service_client;

pub use config_manager::{ConfigManager, ServiceConfig};
pub use service_client::ServiceClient;
