// ABOUTME: Configuration management module for centralized application settings
// ABOUTME: Exposes environment-driven configuration with typed database URLs and log levels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module.
//!
//! All runtime settings come from environment variables; see
//! [`environment::AppConfig::from_env`] for the full list.

/// Environment and application configuration
pub mod environment;

pub use environment::{AppConfig, DatabaseUrl, LlmConfig, LogLevel};
