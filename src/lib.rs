// src/lib.rs
//! Company culture comparison backend: aggregated employer ratings, filtering,
//! similarity ranking, salary insights and the HTTP API serving them.

pub mod admin_cli;
pub mod auth;
pub mod core;
pub mod database;
pub mod demo;
pub mod environment;
pub mod integrations;
pub mod scoring;
pub mod services;
pub mod types;
pub mod utils;
pub mod web;

pub use web::{build_rocket, start_web_server};

/// Level-tagged logging used across the crate, forwarding to `tracing`.
#[macro_export]
macro_rules! app_log {
    (trace, $($arg:tt)+) => { ::tracing::trace!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
}
