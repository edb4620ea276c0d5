//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Name reported when no environment is configured.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name.
    #[serde(default)]
    pub app_env: Option<String>,

    /// Fallback environment name, for images that already export `NODE_ENV`.
    #[serde(default)]
    pub node_env: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(env) = &self.app_env {
            if env.trim().is_empty() {
                return Err("APP_ENV must not be blank when set".to_string());
            }
        }

        if self.app_env.is_none() {
            if let Some(env) = &self.node_env {
                if env.trim().is_empty() {
                    return Err("NODE_ENV must not be blank when set".to_string());
                }
            }
        }

        Ok(())
    }

    /// Resolve the runtime environment. Done once at startup.
    ///
    /// `APP_ENV` wins over `NODE_ENV` when both are set.
    pub fn environment(&self) -> Environment {
        Environment::new(self.app_env.clone().or_else(|| self.node_env.clone()))
    }
}

/// Deployment environment, resolved once and shared with the error renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    name: Option<String>,
}

impl Environment {
    /// Build from the configured name, if any.
    pub fn new(name: Option<String>) -> Self {
        Self { name }
    }

    /// Explicit development environment.
    pub fn development() -> Self {
        Self::new(Some(DEFAULT_ENVIRONMENT.to_string()))
    }

    /// Environment name as reported by the status endpoint.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Whether internal error text may be returned to clients.
    ///
    /// Only an explicitly configured `development` environment qualifies; an
    /// unset environment reports as development but keeps errors generic.
    pub fn exposes_error_details(&self) -> bool {
        self.name.as_deref() == Some(DEFAULT_ENVIRONMENT)
    }
}
