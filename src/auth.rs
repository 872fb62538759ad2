// ABOUTME: Credential store for account registration and login verification
// ABOUTME: Hashes passwords with bcrypt and keeps login failures ambiguous
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Account Registration and Credential Verification
//!
//! Passwords are hashed with bcrypt before they reach storage, and failed
//! logins return one indistinguishable error whether the email is unknown
//! or the password is wrong.

use crate::constants::limits;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use tracing::{info, instrument, warn};

/// Message returned for every failed login attempt.
const LOGIN_FAILED: &str = "Invalid email or password";

/// Registers accounts and verifies login credentials.
#[derive(Clone)]
pub struct CredentialStore {
    database: Database,
}

impl CredentialStore {
    /// Create a credential store backed by the given database.
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the email or password fails validation,
    /// `UserExists` when the email is already registered, or a database
    /// error if storage fails.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AppResult<()> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(AppError::invalid_input("Password must not be empty"));
        }

        if self.database.get_user_by_email(email).await?.is_some() {
            return Err(AppError::duplicate_user(email));
        }

        let password_hash = hash_password(password.to_owned()).await?;
        let user = User::new(email, password_hash);
        self.database.create_user(&user).await?;

        info!("new user registered: {email}");
        Ok(())
    }

    /// Verify a login attempt and return the stored user.
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` with the same message for an unknown email and
    /// a wrong password, or an internal error if verification itself fails.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.database.get_user_by_email(email).await? else {
            warn!("login attempt for unknown email");
            return Err(AppError::invalid_credentials(LOGIN_FAILED));
        };

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("bcrypt verification failed: {e}")))?;

        if !verified {
            warn!("login attempt with wrong password");
            return Err(AppError::invalid_credentials(LOGIN_FAILED));
        }

        info!("user logged in: {}", user.email);
        Ok(user)
    }
}

/// Hash a password on the blocking pool; bcrypt work must stay off the
/// async runtime.
async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("bcrypt hashing failed: {e}")))
}

/// Light shape check: non-empty local part, one `@`, domain with a dot.
fn validate_email(email: &str) -> AppResult<()> {
    let shape_ok = email.len() >= limits::MIN_EMAIL_LENGTH
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

    if shape_ok {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid email address"))
    }
}
