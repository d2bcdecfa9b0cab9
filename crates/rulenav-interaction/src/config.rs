//! Backend endpoint configuration.
//!
//! A single base-URL override is the only deployment knob this crate reads;
//! everything else belongs to the collaborator side.

use std::env;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "RULENAV_API_URL";

/// Default base URL of the local backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where to reach the answering and document collaborators.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    base_url: String,
}

impl BackendConfig {
    /// Creates a config for an explicit base URL. A trailing slash is
    /// stripped so route joining stays uniform.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Reads `RULENAV_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a route onto the base URL. Routes are given with a leading `/`.
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
