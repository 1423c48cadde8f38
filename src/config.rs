// src/config.rs
use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub mount: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3030,
            database_url: None,
            max_connections: 5,
            mount: String::new(),
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: try_load("PORT", "3030")?,
            database_url: var("DATABASE_URL"),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            mount: normalize_mount(&var("POLL_MOUNT").unwrap_or_default()),
        })
    }
}

/// `""` for the root, otherwise `/segment[/segment...]` without a trailing slash.
pub fn normalize_mount(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
