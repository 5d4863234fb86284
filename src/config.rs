//! Configuration module

use std::env;
use std::path::PathBuf;

/// Default artifact filename, looked up relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "churn_model_pipeline.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Path of the serialized model pipeline
    pub model_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unparseable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: lookup("MODEL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            environment: lookup("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
