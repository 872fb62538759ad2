// ABOUTME: Workout progress persistence with surrogate row ids
// ABOUTME: Appends date-stamped entries and lists, updates, and deletes them scoped by account
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{NewProgress, ProgressEntry, ProgressUpdate};
use chrono::Utc;
use sqlx::Row;
use tracing::debug;

impl Database {
    /// Create the progress table.
    pub(super) async fn migrate_progress(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL REFERENCES users(email),
                exercise_name TEXT NOT NULL,
                day_name TEXT NOT NULL,
                sets_done INTEGER NOT NULL,
                reps_done INTEGER NOT NULL,
                weight_used REAL NOT NULL,
                notes TEXT,
                completed_date DATE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_progress_user_date ON workout_progress(user_email, completed_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a progress entry stamped with today's date.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn log_progress(
        &self,
        user_email: &str,
        progress: &NewProgress,
    ) -> AppResult<ProgressEntry> {
        let completed_date = Utc::now().date_naive();

        let row = sqlx::query(
            r"
            INSERT INTO workout_progress
                (user_email, exercise_name, day_name, sets_done, reps_done, weight_used, notes, completed_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(user_email)
        .bind(&progress.exercise_name)
        .bind(&progress.day_name)
        .bind(progress.sets_done)
        .bind(progress.reps_done)
        .bind(progress.weight_used)
        .bind(&progress.notes)
        .bind(completed_date)
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = row.get("id");
        debug!(id, user_email, "progress entry logged");

        Ok(ProgressEntry {
            id: Some(id),
            user_email: user_email.to_owned(),
            exercise_name: progress.exercise_name.clone(),
            day_name: progress.day_name.clone(),
            sets_done: progress.sets_done,
            reps_done: progress.reps_done,
            weight_used: progress.weight_used,
            notes: progress.notes.clone(),
            completed_date,
        })
    }

    /// All progress for an account across every plan, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_progress(&self, user_email: &str) -> AppResult<Vec<ProgressEntry>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_email, exercise_name, day_name,
                   sets_done, reps_done, weight_used, notes, completed_date
            FROM workout_progress
            WHERE user_email = $1
            ORDER BY completed_date DESC, id DESC
            ",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ProgressEntry {
                id: Some(row.get("id")),
                user_email: row.get("user_email"),
                exercise_name: row.get("exercise_name"),
                day_name: row.get("day_name"),
                sets_done: row.get("sets_done"),
                reps_done: row.get("reps_done"),
                weight_used: row.get("weight_used"),
                notes: row.get("notes"),
                completed_date: row.get("completed_date"),
            })
            .collect())
    }

    /// Update the counted fields of one progress entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the id does not exist for this user,
    /// or a database error if the update fails.
    pub async fn update_progress(
        &self,
        progress_id: i64,
        user_email: &str,
        update: &ProgressUpdate,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE workout_progress
            SET sets_done = $1, reps_done = $2, weight_used = $3, notes = $4
            WHERE id = $5 AND user_email = $6
            ",
        )
        .bind(update.sets_done)
        .bind(update.reps_done)
        .bind(update.weight_used)
        .bind(&update.notes)
        .bind(progress_id)
        .bind(user_email)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Progress entry {progress_id} not found"
            )));
        }

        Ok(())
    }

    /// Delete one progress entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the id does not exist for this user,
    /// or a database error if the delete fails.
    pub async fn delete_progress(&self, progress_id: i64, user_email: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM workout_progress WHERE id = $1 AND user_email = $2")
            .bind(progress_id)
            .bind(user_email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Progress entry {progress_id} not found"
            )));
        }

        debug!(progress_id, user_email, "progress entry deleted");
        Ok(())
    }
}
