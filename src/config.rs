// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Minimum length of the session token signing key.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address (loopback unless overridden)
    pub bind_addr: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// JSON data file; `None` keeps everything in memory
    pub data_file: Option<PathBuf>,
    /// HS256 key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// Include the demo profiles in the directory
    pub seed_directory: bool,
}

impl Config {
    /// Config for tests. In-memory store, fixed signing key.
    pub fn test_default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            data_file: None,
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            seed_directory: true,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let session_signing_key = env::var("SESSION_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .trim()
            .as_bytes()
            .to_vec();
        if session_signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ConfigError::Invalid {
                name: "SESSION_SIGNING_KEY",
                reason: format!("must be at least {} bytes", MIN_SIGNING_KEY_LEN),
            });
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("not a port number: {}", raw),
            })?,
            Err(_) => 8080,
        };

        let seed_directory = match env::var("FITBUDDY_SEED_DIRECTORY") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                name: "FITBUDDY_SEED_DIRECTORY",
                reason: format!("expected true/false, got {}", raw),
            })?,
            Err(_) => true,
        };

        Ok(Self {
            bind_addr: env::var("FITBUDDY_BIND").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_file: env::var("FITBUDDY_DATA_FILE")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            session_signing_key,
            seed_directory,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}
