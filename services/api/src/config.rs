//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which implementation of the humanizer port to wire in at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HumanizerBackend {
    /// The sentence-shuffle simulator. Default, and the authoritative
    /// behavior: output is nondeterministic and scores are fabricated.
    Simulated,
    /// A real chat-completion call. Requires `OPENAI_API_KEY`.
    OpenAi,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub uploads_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub humanizer_backend: HumanizerBackend,
    pub humanizer_model: String,
    pub guest_username: String,
    pub guest_password: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        // --- Load Humanizer Settings ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let backend_str =
            std::env::var("HUMANIZER_BACKEND").unwrap_or_else(|_| "simulated".to_string());
        let humanizer_backend = match backend_str.to_lowercase().as_str() {
            "simulated" => HumanizerBackend::Simulated,
            "openai" => HumanizerBackend::OpenAi,
            other => {
                return Err(ConfigError::InvalidValue(
                    "HUMANIZER_BACKEND".to_string(),
                    format!("'{}' is not a known backend", other),
                ))
            }
        };

        let humanizer_model =
            std::env::var("HUMANIZER_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        // --- Load Guest Account Settings ---
        // The guest account owns every stored record. Its password is a
        // secret and must come from the environment, never from source.
        let guest_username =
            std::env::var("GUEST_USERNAME").unwrap_or_else(|_| "guest".to_string());
        let guest_password = std::env::var("GUEST_PASSWORD")
            .map_err(|_| ConfigError::MissingVar("GUEST_PASSWORD".to_string()))?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            uploads_dir,
            openai_api_key,
            humanizer_backend,
            humanizer_model,
            guest_username,
            guest_password,
        })
    }

    /// Where converted artifacts are written before being copied into the
    /// download area.
    pub fn converted_dir(&self) -> PathBuf {
        self.uploads_dir.join("converted")
    }
}
