// ABOUTME: Workout plan persistence across the plan, day, and exercise tables
// ABOUTME: Implements listing, ordered tree reload, transactional replace, and cascade delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, PlanSummary, WorkoutDay, WorkoutPlan};
use sqlx::Row;
use tracing::{debug, info};

impl Database {
    /// Create the plan, day, and exercise tables.
    pub(super) async fn migrate_plans(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL REFERENCES users(email),
                goal TEXT NOT NULL,
                days_per_week INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                plan_id INTEGER NOT NULL REFERENCES workout_plans(id) ON DELETE CASCADE,
                day_name TEXT NOT NULL,
                focus TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id INTEGER NOT NULL REFERENCES workout_days(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                sets INTEGER NOT NULL,
                reps INTEGER NOT NULL,
                rest_time INTEGER,
                weight REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_plans_user_email ON workout_plans(user_email)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_days_plan_id ON workout_days(plan_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_exercises_day_id ON workout_exercises(day_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List a user's saved plans as summaries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_plans(&self, user_email: &str) -> AppResult<Vec<PlanSummary>> {
        let rows = sqlx::query(
            r"
            SELECT id, goal, days_per_week, created_at
            FROM workout_plans
            WHERE user_email = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| PlanSummary {
                id: row.get("id"),
                goal: row.get("goal"),
                days_per_week: row.get("days_per_week"),
                created_at: row.get("created_at"),
            })
            .collect())
    }

    /// Load a full plan tree.
    ///
    /// Days and exercises come back in the order they were saved. Returns
    /// `Ok(None)` when the plan does not exist, including after a delete.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn get_plan(&self, plan_id: i64) -> AppResult<Option<WorkoutPlan>> {
        let Some(plan_row) =
            sqlx::query("SELECT id, user_email, goal, days_per_week FROM workout_plans WHERE id = $1")
                .bind(plan_id)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        let mut plan = WorkoutPlan {
            id: Some(plan_row.get("id")),
            user_email: Some(plan_row.get("user_email")),
            goal: plan_row.get("goal"),
            days_per_week: plan_row.get("days_per_week"),
            workout_days: Vec::new(),
        };

        // One pass over a day/exercise join; days without exercises still
        // produce a row with NULL exercise columns.
        let rows = sqlx::query(
            r"
            SELECT wd.id AS day_id, wd.day_name, wd.focus,
                   we.id AS exercise_id, we.name, we.sets, we.reps, we.rest_time, we.weight
            FROM workout_days wd
            LEFT JOIN workout_exercises we ON we.day_id = wd.id
            WHERE wd.plan_id = $1
            ORDER BY wd.id, we.id
            ",
        )
        .bind(plan_id)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let day_id: i64 = row.get("day_id");

            let start_new_day = plan
                .workout_days
                .last()
                .map_or(true, |day| day.id != Some(day_id));
            if start_new_day {
                plan.workout_days.push(WorkoutDay {
                    id: Some(day_id),
                    day_name: row.get("day_name"),
                    focus: row.get("focus"),
                    exercises: Vec::new(),
                });
            }

            let exercise_id: Option<i64> = row.get("exercise_id");
            if let (Some(exercise_id), Some(day)) = (exercise_id, plan.workout_days.last_mut()) {
                day.exercises.push(Exercise {
                    id: Some(exercise_id),
                    name: row.get("name"),
                    sets: row.get("sets"),
                    reps: row.get("reps"),
                    rest_time: row.get("rest_time"),
                    weight: row.get("weight"),
                });
            }
        }

        Ok(Some(plan))
    }

    /// Insert a new plan or fully replace an existing one.
    ///
    /// Replacement updates the plan row, drops every old day and exercise,
    /// and reinserts the incoming tree. The whole operation runs in one
    /// transaction, so readers never observe a half-written plan.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when replacing a plan that does not exist
    /// for this user, or a database error if any statement fails.
    pub async fn save_plan(&self, plan: &WorkoutPlan, user_email: &str) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;

        let plan_id = if let Some(plan_id) = plan.id {
            let updated = sqlx::query(
                "UPDATE workout_plans SET goal = $1, days_per_week = $2 WHERE id = $3 AND user_email = $4",
            )
            .bind(&plan.goal)
            .bind(plan.days_per_week)
            .bind(plan_id)
            .bind(user_email)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::not_found(format!("Plan {plan_id} not found")));
            }

            sqlx::query(
                "DELETE FROM workout_exercises WHERE day_id IN (SELECT id FROM workout_days WHERE plan_id = $1)",
            )
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM workout_days WHERE plan_id = $1")
                .bind(plan_id)
                .execute(&mut *tx)
                .await?;

            plan_id
        } else {
            let row = sqlx::query(
                "INSERT INTO workout_plans (user_email, goal, days_per_week) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(user_email)
            .bind(&plan.goal)
            .bind(plan.days_per_week)
            .fetch_one(&mut *tx)
            .await?;
            row.get("id")
        };

        for day in &plan.workout_days {
            let day_row = sqlx::query(
                "INSERT INTO workout_days (plan_id, day_name, focus) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(plan_id)
            .bind(&day.day_name)
            .bind(&day.focus)
            .fetch_one(&mut *tx)
            .await?;
            let day_id: i64 = day_row.get("id");

            for exercise in &day.exercises {
                sqlx::query(
                    "INSERT INTO workout_exercises (day_id, name, sets, reps, rest_time, weight) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(day_id)
                .bind(&exercise.name)
                .bind(exercise.sets)
                .bind(exercise.reps)
                .bind(exercise.rest_time)
                .bind(exercise.weight)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        debug!(plan_id, user_email, "workout plan saved");
        Ok(plan_id)
    }

    /// Delete a plan and every day and exercise under it.
    ///
    /// Children are removed first inside one transaction; a failure at any
    /// step rolls the whole delete back.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the plan does not exist for this
    /// user, or a database error if any statement fails.
    pub async fn delete_plan(&self, plan_id: i64, user_email: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM workout_exercises WHERE day_id IN (SELECT id FROM workout_days WHERE plan_id = $1)",
        )
        .bind(plan_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM workout_days WHERE plan_id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM workout_plans WHERE id = $1 AND user_email = $2")
            .bind(plan_id)
            .bind(user_email)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Plan {plan_id} not found")));
        }

        tx.commit().await?;
        info!(plan_id, user_email, "workout plan deleted");
        Ok(())
    }
}
