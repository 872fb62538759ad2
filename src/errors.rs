// ABOUTME: Unified error taxonomy shared by every module in the crate.
// ABOUTME: Defines ErrorCode categories, the AppError carrier, and conversions from library errors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Application error handling.
//!
//! Every fallible operation returns [`AppResult`]. The [`ErrorCode`] on each
//! [`AppError`] tells callers what went wrong without parsing message text:
//! credential failures stay deliberately ambiguous, storage failures carry
//! their source error, and generation failures distinguish provider faults
//! from timeouts.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

/// Stable machine-readable categories for application failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Operation requires an authenticated session
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Email or password did not match a stored credential
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Caller-supplied value failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Registration attempted with an email that is already taken
    #[serde(rename = "USER_EXISTS")]
    UserExists,
    /// Requested record does not exist or is not visible to the caller
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,
    /// Plan generation backend reported a failure
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed,
    /// Plan generation exceeded its time budget
    #[serde(rename = "GENERATION_TIMEOUT")]
    GenerationTimeout,
    /// Generated plan text did not match the expected structure
    #[serde(rename = "MALFORMED_PLAN")]
    MalformedPlan,
    /// Environment or startup configuration is invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Underlying database operation failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Human-readable description of the error category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalid => "Invalid credentials",
            Self::InvalidInput => "Invalid input",
            Self::UserExists => "User already exists",
            Self::ResourceNotFound => "Resource not found",
            Self::GenerationFailed => "Plan generation failed",
            Self::GenerationTimeout => "Plan generation timed out",
            Self::MalformedPlan => "Malformed plan",
            Self::ConfigError => "Configuration error",
            Self::DatabaseError => "Database error",
            Self::InternalError => "Internal error",
        }
    }
}

/// Application error with a stable code, message, and optional source.
#[derive(Debug, thiserror::Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Stable category for the failure
    pub code: ErrorCode,
    /// Human-readable detail
    pub message: String,
    /// Underlying error, when one exists
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Operation requires a logged-in user.
    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthRequired, message)
    }

    /// Credential check failed. Callers must use the same message for
    /// unknown emails and wrong passwords so accounts cannot be enumerated.
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Caller-supplied value failed validation.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Registration collided with an existing account.
    pub fn duplicate_user(email: &str) -> Self {
        Self::new(
            ErrorCode::UserExists,
            format!("An account already exists for {email}"),
        )
    }

    /// Requested record does not exist or belongs to someone else.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, resource)
    }

    /// Plan generation backend failed.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// Plan generation exceeded its time budget.
    pub fn generation_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationTimeout, message)
    }

    /// Generated plan text did not match the expected structure.
    pub fn malformed_plan(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedPlan, message)
    }

    /// Environment or startup configuration is invalid.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Underlying database operation failed.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string()).with_source(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
