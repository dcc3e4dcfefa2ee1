//! Server configuration.
//!
//! Environment variables must be set by the runtime environment (container
//! env_file, or sourced env files in local dev); nothing here reads config
//! files.

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3001;

    /// Read `BACKEND_HOST` / `BACKEND_PORT`, falling back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let host =
            std::env::var("BACKEND_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());
        let port = match std::env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got {raw:?}"))
            })?,
            Err(_) => Self::DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }
}
