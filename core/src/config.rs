//! Client configuration.

use std::env;

pub const BASE_URL_ENV: &str = "TODO_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:9999";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `TODO_API_BASE_URL`, falling back to `DEFAULT_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_value(env::var(BASE_URL_ENV).ok())
    }

    /// Builds a config from an optional raw value. Missing or blank values
    /// fall back to `DEFAULT_BASE_URL`.
    pub fn from_value(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
