// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Firestore project holding the locations collection
    pub firestore_project_id: String,

    /// Web API key sent with every Firestore REST call (may be empty for open rules)
    pub firestore_api_key: String,

    /// Collection queried for locations
    pub firestore_collection: String,

    /// Firestore REST root, overridable for emulators
    pub firestore_base_url: String,

    /// Remote store request timeout in seconds
    pub store_timeout_secs: u64,

    /// Outgoing query budget per second
    pub store_requests_per_second: u32,

    /// Upper bound for a one-shot geolocation request in milliseconds
    pub geolocation_timeout_ms: u64,

    /// Interval between stale cache sweeps in seconds
    pub cache_cleanup_interval_secs: u64,

    /// Admin authentication token (for cache maintenance endpoints)
    pub admin_token: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: var_or("SERVER_ADDRESS", "127.0.0.1"),
            server_port: parsed_or("SERVER_PORT", 8003),
            environment: var_or("ENVIRONMENT", "development"),
            log_level: var_or("LOG_LEVEL", "info"),
            firestore_project_id: var_or("FIRESTORE_PROJECT_ID", ""),
            firestore_api_key: var_or("FIRESTORE_API_KEY", ""),
            firestore_collection: var_or("FIRESTORE_COLLECTION", "locations"),
            firestore_base_url: var_or(
                "FIRESTORE_BASE_URL",
                "https://firestore.googleapis.com/v1",
            ),
            store_timeout_secs: parsed_or("STORE_TIMEOUT_SECS", 15),
            store_requests_per_second: parsed_or("STORE_REQUESTS_PER_SECOND", 10),
            geolocation_timeout_ms: parsed_or("GEOLOCATION_TIMEOUT_MS", 7000),
            cache_cleanup_interval_secs: parsed_or("CACHE_CLEANUP_INTERVAL_SECS", 300),
            admin_token: var_or("ADMIN_TOKEN", "admin-token-dev"),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.firestore_project_id.trim().is_empty() {
            return Err("FIRESTORE_PROJECT_ID is required".to_string());
        }

        if self.store_requests_per_second == 0 {
            return Err("STORE_REQUESTS_PER_SECOND must be positive".to_string());
        }

        if self.firestore_api_key.is_empty() {
            log::warn!("FIRESTORE_API_KEY not configured - relying on open security rules");
        }

        Ok(())
    }
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for handler and client tests
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            firestore_project_id: "explora-test".to_string(),
            firestore_api_key: "test-key".to_string(),
            firestore_collection: "locations".to_string(),
            firestore_base_url: base_url.to_string(),
            store_timeout_secs: 5,
            store_requests_per_second: 100,
            geolocation_timeout_ms: 200,
            cache_cleanup_interval_secs: 300,
            admin_token: "admin-secret".to_string(),
        }
    }
}
