// ABOUTME: Core data models for users, workout plans, and progress records
// ABOUTME: Defines the plan tree (plan -> days -> exercises) persisted by the database layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Data Models
//!
//! Core data structures shared by the storage, generation, and workflow
//! layers. A [`WorkoutPlan`] owns its [`WorkoutDay`]s, each of which owns
//! its [`Exercise`]s; the database layer persists and reloads that tree in
//! the order it was created.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// The stored hash is bcrypt output and is never shown to users or logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Email address, unique across all accounts
    pub email: String,
    /// Bcrypt hash of the account password
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record with the current timestamp.
    #[must_use]
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// A complete weekly workout plan.
///
/// `id` and `user_email` are `None` until the plan is saved; freshly parsed
/// plans carry structure only and gain identity at persistence time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Database identity, assigned on first save
    pub id: Option<i64>,
    /// Owning account, assigned on save
    pub user_email: Option<String>,
    /// Training goal the plan was built for
    pub goal: String,
    /// Scheduled training days per week
    pub days_per_week: i32,
    /// Training days in creation order
    pub workout_days: Vec<WorkoutDay>,
}

impl WorkoutPlan {
    /// Create an empty plan shell for the given goal.
    #[must_use]
    pub fn new(goal: impl Into<String>, days_per_week: i32) -> Self {
        Self {
            id: None,
            user_email: None,
            goal: goal.into(),
            days_per_week,
            workout_days: Vec::new(),
        }
    }

    /// Total number of exercises across all days.
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.workout_days.iter().map(|d| d.exercises.len()).sum()
    }
}

/// One training day inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    /// Database identity, assigned on save
    pub id: Option<i64>,
    /// Label such as "Day 1" or "Monday"
    pub day_name: String,
    /// Optional focus such as "Chest & Triceps"
    pub focus: Option<String>,
    /// Exercises in creation order
    pub exercises: Vec<Exercise>,
}

impl WorkoutDay {
    /// Create a day with no exercises yet.
    #[must_use]
    pub fn new(day_name: impl Into<String>, focus: Option<String>) -> Self {
        Self {
            id: None,
            day_name: day_name.into(),
            focus,
            exercises: Vec::new(),
        }
    }
}

/// One exercise prescription inside a training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Database identity, assigned on save
    pub id: Option<i64>,
    /// Exercise name such as "Bench Press"
    pub name: String,
    /// Number of sets
    pub sets: i32,
    /// Repetitions per set
    pub reps: i32,
    /// Rest between sets in seconds; `None` means not prescribed
    pub rest_time: Option<i32>,
    /// Working weight in kilograms; `None` for bodyweight work
    pub weight: Option<f64>,
}

impl Exercise {
    /// Rest period in seconds, with unset rest treated as zero.
    #[must_use]
    pub fn rest_or_zero(&self) -> i32 {
        self.rest_time.unwrap_or(0)
    }
}

/// Lightweight plan listing row: identity and headline facts only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Database identity
    pub id: i64,
    /// Training goal the plan was built for
    pub goal: String,
    /// Scheduled training days per week
    pub days_per_week: i32,
    /// When the plan was saved
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when logging a new workout result.
///
/// Identity and date are assigned by the storage layer on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgress {
    /// Exercise that was performed
    pub exercise_name: String,
    /// Training day the exercise came from
    pub day_name: String,
    /// Sets completed
    pub sets_done: i32,
    /// Reps completed per set
    pub reps_done: i32,
    /// Weight used in kilograms
    pub weight_used: f64,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Correction applied to an already logged workout result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Corrected set count
    pub sets_done: i32,
    /// Corrected rep count
    pub reps_done: i32,
    /// Corrected weight in kilograms
    pub weight_used: f64,
    /// Replacement notes
    pub notes: Option<String>,
}

/// One logged workout result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Database identity, assigned on save
    pub id: Option<i64>,
    /// Account the entry belongs to
    pub user_email: String,
    /// Exercise that was performed
    pub exercise_name: String,
    /// Training day the exercise came from
    pub day_name: String,
    /// Sets completed
    pub sets_done: i32,
    /// Reps completed per set
    pub reps_done: i32,
    /// Weight used in kilograms
    pub weight_used: f64,
    /// Free-form notes
    pub notes: Option<String>,
    /// Calendar date the workout happened
    pub completed_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_has_no_identity() {
        let plan = WorkoutPlan::new("Build muscle", 4);
        assert!(plan.id.is_none());
        assert!(plan.user_email.is_none());
        assert!(plan.workout_days.is_empty());
    }

    #[test]
    fn exercise_count_spans_all_days() {
        let mut plan = WorkoutPlan::new("Strength", 2);
        let mut day1 = WorkoutDay::new("Day 1", Some("Push".to_owned()));
        day1.exercises.push(Exercise {
            id: None,
            name: "Bench Press".to_owned(),
            sets: 3,
            reps: 10,
            rest_time: Some(90),
            weight: Some(60.0),
        });
        let mut day2 = WorkoutDay::new("Day 2", None);
        day2.exercises.push(Exercise {
            id: None,
            name: "Squat".to_owned(),
            sets: 5,
            reps: 5,
            rest_time: None,
            weight: None,
        });
        day2.exercises.push(Exercise {
            id: None,
            name: "Plank".to_owned(),
            sets: 3,
            reps: 1,
            rest_time: Some(60),
            weight: None,
        });
        plan.workout_days.push(day1);
        plan.workout_days.push(day2);
        assert_eq!(plan.exercise_count(), 3);
    }

    #[test]
    fn unset_rest_reads_as_zero() {
        let exercise = Exercise {
            id: None,
            name: "Pull Up".to_owned(),
            sets: 3,
            reps: 8,
            rest_time: None,
            weight: None,
        };
        assert_eq!(exercise.rest_or_zero(), 0);
    }
}
