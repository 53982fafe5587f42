//! Configuration for the booking wizard.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Wizard configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Managed backend configuration.
    pub backend: BackendConfig,
    /// Page paths used for navigation intents.
    pub pages: PagesConfig,
}

/// Managed backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the managed backend (REST surface and functions).
    pub base_url: String,
    /// Public API key sent with every request.
    pub api_key: String,
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

/// Page paths used when building navigation intents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Path of the booking page (login return path).
    pub booking_path: String,
    /// Path of the login page.
    pub login_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables and defaults:
    ///
    /// - `BOOKFLOW_BACKEND_URL` (default `http://localhost:54321`)
    /// - `BOOKFLOW_BACKEND_API_KEY` (default empty)
    /// - `BOOKFLOW_REQUEST_TIMEOUT_SECS` (default `10`)
    /// - `BOOKFLOW_BOOKING_PATH` (default `/booking`)
    /// - `BOOKFLOW_LOGIN_PATH` (default `/login`)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            backend: BackendConfig {
                base_url: env_or("BOOKFLOW_BACKEND_URL", "http://localhost:54321"),
                api_key: env_or("BOOKFLOW_BACKEND_API_KEY", ""),
                request_timeout: Duration::from_secs(
                    env_or("BOOKFLOW_REQUEST_TIMEOUT_SECS", "10")
                        .parse()
                        .unwrap_or(10),
                ),
            },
            pages: PagesConfig {
                booking_path: env_or("BOOKFLOW_BOOKING_PATH", "/booking"),
                login_path: env_or("BOOKFLOW_LOGIN_PATH", "/login"),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
