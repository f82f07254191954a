use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub directory: DirectoryConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Tuning for the principal directory: bulk-load and search page sizes, the
/// search debounce window, and the minimum query length that triggers a
/// remote search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub initial_load_size: usize,
    pub search_page_size: usize,
    pub search_debounce_ms: u64,
    pub min_search_length: usize,
    pub debug_logging: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            initial_load_size: 100,
            search_page_size: 50,
            search_debounce_ms: 500,
            min_search_length: 2,
            debug_logging: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("DOCKET_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Directory overrides
        if let Ok(v) = env::var("DOCKET_DIRECTORY_LOAD_SIZE") {
            self.directory.initial_load_size = v.parse().unwrap_or(self.directory.initial_load_size);
        }
        if let Ok(v) = env::var("DOCKET_SEARCH_PAGE_SIZE") {
            self.directory.search_page_size = v.parse().unwrap_or(self.directory.search_page_size);
        }
        if let Ok(v) = env::var("DOCKET_SEARCH_DEBOUNCE_MS") {
            self.directory.search_debounce_ms = v.parse().unwrap_or(self.directory.search_debounce_ms);
        }
        if let Ok(v) = env::var("DOCKET_MIN_SEARCH_LENGTH") {
            self.directory.min_search_length = v.parse().unwrap_or(self.directory.min_search_length);
        }
        if let Ok(v) = env::var("DOCKET_DIRECTORY_DEBUG_LOGGING") {
            self.directory.debug_logging = v.parse().unwrap_or(self.directory.debug_logging);
        }

        // HTTP overrides
        if let Ok(v) = env::var("DOCKET_HTTP_TIMEOUT_SECS") {
            self.http.request_timeout_secs = v.parse().unwrap_or(self.http.request_timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            directory: DirectoryConfig { debug_logging: true, ..Default::default() },
            http: HttpConfig { request_timeout_secs: 30 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            directory: DirectoryConfig::default(),
            http: HttpConfig { request_timeout_secs: 15 },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            directory: DirectoryConfig::default(),
            http: HttpConfig { request_timeout_secs: 10 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);
