// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, typed database URLs, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration.
//!
//! Everything the application needs at startup comes from environment
//! variables. `DATABASE_URL` and `OPENAI_API_KEY` are required; the rest
//! fall back to defaults from [`crate::constants::defaults`].

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Strongly typed log level configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything, including per-query noise
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback to `Info`.
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Type-safe database location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Path to the database file
        path: PathBuf,
    },
    /// PostgreSQL connection
    PostgreSQL {
        /// Full connection string
        connection_string: String,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a URL string into a typed location.
    ///
    /// Unrecognized schemes fall back to a SQLite file path, matching how
    /// bare paths are usually intended.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Self::Memory
            } else {
                Self::SQLite {
                    path: PathBuf::from(path_str),
                }
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Self::PostgreSQL {
                connection_string: s.to_owned(),
            }
        } else {
            Self::SQLite {
                path: PathBuf::from(s),
            }
        }
    }

    /// Convert back to a connection string.
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::PostgreSQL { connection_string } => connection_string.clone(),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database.
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Check if this is a SQLite database (file or memory).
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::SQLite { .. } | Self::Memory)
    }

    /// Check if this is a PostgreSQL database.
    #[must_use]
    pub const fn is_postgresql(&self) -> bool {
        matches!(self, Self::PostgreSQL { .. })
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/ironplan.db"),
        }
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Connection settings for the OpenAI-compatible generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Bearer token for the API
    pub api_key: String,
    /// Model requested for generation
    pub model: String,
}

/// Full application configuration loaded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where user, plan, and progress data lives
    pub database_url: DatabaseUrl,
    /// Generation backend settings
    pub llm: LlmConfig,
    /// Upper bound on one generation round trip, in seconds
    pub generation_timeout_secs: u64,
    /// Log level
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when `DATABASE_URL` or `OPENAI_API_KEY` is
    /// missing or empty, when `GENERATION_TIMEOUT_SECS` is not a positive
    /// integer, or when validation fails.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let database_url = DatabaseUrl::parse_url(&required_env("DATABASE_URL")?);
        let api_key = required_env("OPENAI_API_KEY")?;
        let base_url = env_var_or("OPENAI_BASE_URL", defaults::OPENAI_BASE_URL);
        let model = env_var_or("OPENAI_MODEL", defaults::OPENAI_MODEL);

        let timeout_raw = env_var_or(
            "GENERATION_TIMEOUT_SECS",
            &defaults::GENERATION_TIMEOUT_SECS.to_string(),
        );
        let generation_timeout_secs: u64 = timeout_raw.parse().map_err(|_| {
            AppError::config(format!(
                "GENERATION_TIMEOUT_SECS must be a positive integer, got {timeout_raw:?}"
            ))
        })?;

        let log_level =
            LogLevel::from_str_or_default(&env_var_or("RUST_LOG", defaults::LOG_LEVEL));

        let config = Self {
            database_url,
            llm: LlmConfig {
                base_url,
                api_key,
                model,
            },
            generation_timeout_secs,
            log_level,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a value is out of range or names a
    /// backend this build does not bundle.
    pub fn validate(&self) -> AppResult<()> {
        if self.generation_timeout_secs == 0 {
            return Err(AppError::config("GENERATION_TIMEOUT_SECS must be positive"));
        }
        if self.database_url.is_postgresql() {
            return Err(AppError::config(
                "PostgreSQL is not bundled in this build; use a sqlite: URL",
            ));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(AppError::config("OPENAI_BASE_URL must not be empty"));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets).
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Ironplan Configuration:\n\
             - Database: {}\n\
             - LLM Endpoint: {}\n\
             - Model: {}\n\
             - API Key: {}\n\
             - Generation Timeout: {}s\n\
             - Log Level: {}",
            if self.database_url.is_memory() {
                "SQLite (in-memory)".to_owned()
            } else {
                self.database_url.to_connection_string()
            },
            self.llm.base_url,
            self.llm.model,
            if self.llm.api_key.is_empty() {
                "missing"
            } else {
                "configured"
            },
            self.generation_timeout_secs,
            self.log_level,
        )
    }
}

/// Get a required environment variable, treating empty values as missing.
fn required_env(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!("{key} must be set"))),
    }
}

/// Get environment variable or default value.
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
