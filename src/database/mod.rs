// ABOUTME: SQLite-backed storage for users, workout plans, and progress records
// ABOUTME: Owns the connection pool, schema migration, and the per-table operation modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Database Management
//!
//! Storage layer for accounts, workout plans, and logged progress. Plans are
//! a three-level tree (plan, days, exercises) persisted across three tables
//! and reloaded in creation order. All multi-row writes run inside a single
//! transaction so a failure never leaves a partial plan behind.

mod plans;
mod progress;
mod users;

use crate::errors::AppResult;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

/// Database manager for user, plan, and progress storage.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let pool = if database_url.contains(":memory:") {
            // A pooled in-memory SQLite database disappears with its last
            // connection, and every new connection sees a fresh empty one.
            // Pin a single long-lived connection so the schema survives.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            // Ensure SQLite creates the database file if it doesn't exist
            let connection_options =
                if database_url.starts_with("sqlite:") && !database_url.contains('?') {
                    format!("{database_url}?mode=rwc")
                } else {
                    database_url.to_owned()
                };
            SqlitePool::connect(&connection_options).await?
        };

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_plans().await?;
        self.migrate_progress().await?;
        info!("Database migrations completed");
        Ok(())
    }
}
