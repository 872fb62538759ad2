// ABOUTME: User account database operations
// ABOUTME: Handles account rows and lookups by email
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use sqlx::Row;

impl Database {
    /// Create the users table.
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new user row.
    ///
    /// # Errors
    ///
    /// Returns `UserExists` when the email is already registered, or a
    /// database error if the insert fails.
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query("INSERT INTO users (email, password_hash, created_at) VALUES ($1, $2, $3)")
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::duplicate_user(&user.email)
                }
                _ => AppError::from(e),
            })?;

        Ok(())
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row =
            sqlx::query("SELECT email, password_hash, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|row| User {
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }
}
