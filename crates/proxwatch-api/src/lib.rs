//! Shared API surface for proxwatch: typed DTOs for the cluster monitoring
//! backend, the typed error envelope, the HTTP transport client, and
//! client-side configuration.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use config::Config;
pub use error::ApiError;
