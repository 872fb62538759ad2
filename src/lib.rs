// ABOUTME: Main library entry point for the ironplan workout planner
// ABOUTME: Wires credentials, plan storage, generation and the session workflow into one crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # ironplan
//!
//! AI-assisted workout planning and progress tracking. The crate generates
//! weekly workout plans through an OpenAI-compatible chat backend, persists
//! them per user in SQLite, and drives an interactive editing workflow over
//! an explicit session state machine.
//!
//! ## Features
//!
//! - **Accounts**: bcrypt-hashed credentials with registration and login
//! - **Plan generation**: deterministic prompts against any
//!   OpenAI-compatible endpoint, with a hard timeout
//! - **Strict parsing**: generated JSON is validated field by field before
//!   anything is persisted
//! - **Draft editing**: in-memory drafts with removal flags and appendable
//!   rows; storage is touched only on save
//! - **Progress log**: per-user progress entries keyed by date
//!
//! ## Quick Start
//!
//! 1. Set `DATABASE_URL` (e.g. `sqlite:./data/ironplan.db`) and
//!    `OPENAI_API_KEY`
//! 2. Run the `ironplan` binary and register an account
//! 3. Ask for a plan, edit the draft, save it
//!
//! ## Architecture
//!
//! - **models**: plain data types shared across layers
//! - **database**: SQLite persistence for users, plans and progress
//! - **llm / planner**: provider seam, prompt construction, response parsing
//! - **workflow**: the session state machine the binary drives
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ironplan::config::environment::AppConfig;
//! use ironplan::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = AppConfig::from_env()?;
//!     config.validate()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Credential registration and verification
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// Application constants and default values
pub mod constants;

/// User, plan and progress persistence over SQLite
pub mod database;

/// Unified error handling system with standard error codes
pub mod errors;

/// LLM provider abstraction for AI chat integration
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// Common data models for plans and progress
pub mod models;

/// Plan generation, response parsing and intent classification
pub mod planner;

/// Session state machine driving the interactive workflow
pub mod workflow;
