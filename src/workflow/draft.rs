// ABOUTME: In-memory editable draft of a workout plan
// ABOUTME: Tracks removal flags and assembles a persistable plan on save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Plan Drafts
//!
//! Editing never touches storage. A [`PlanDraft`] clones a persisted or
//! freshly generated plan, accumulates field edits, removal flags and
//! appended rows in memory, and assembles a [`WorkoutPlan`] only when the
//! session saves it.

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, WorkoutDay, WorkoutPlan};

/// One editable exercise row.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftExercise {
    /// Exercise name.
    pub name: String,
    /// Number of sets.
    pub sets: i32,
    /// Repetitions per set.
    pub reps: i32,
    /// Rest between sets in seconds.
    pub rest_time: Option<i32>,
    /// Working weight; `None` for bodyweight.
    pub weight: Option<f64>,
    /// Marked rows stay visible in the draft but are excluded from the
    /// assembled plan.
    pub removed: bool,
}

impl DraftExercise {
    /// Fresh row with the standard defaults and no weight.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            name: String::new(),
            sets: defaults::EXERCISE_SETS,
            reps: defaults::EXERCISE_REPS,
            rest_time: Some(defaults::EXERCISE_REST_SECS),
            weight: None,
            removed: false,
        }
    }

    fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            sets: exercise.sets,
            reps: exercise.reps,
            rest_time: exercise.rest_time,
            weight: exercise.weight,
            removed: false,
        }
    }

    #[allow(clippy::float_cmp)]
    fn into_exercise(self) -> Exercise {
        Exercise {
            id: None,
            name: self.name,
            sets: self.sets,
            reps: self.reps,
            rest_time: self.rest_time,
            // A weight of exactly 0 means bodyweight, stored as absent.
            weight: self.weight.filter(|w| *w != 0.0),
        }
    }
}

/// One editable training day.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftDay {
    /// Day label, e.g. "Day 1".
    pub day_name: String,
    /// Muscle-group focus, if any.
    pub focus: Option<String>,
    /// Exercise rows, including rows marked removed.
    pub exercises: Vec<DraftExercise>,
}

impl DraftDay {
    fn from_day(day: &WorkoutDay) -> Self {
        Self {
            day_name: day.day_name.clone(),
            focus: day.focus.clone(),
            exercises: day.exercises.iter().map(DraftExercise::from_exercise).collect(),
        }
    }

    fn into_day(self) -> WorkoutDay {
        WorkoutDay {
            id: None,
            day_name: self.day_name,
            focus: self.focus,
            exercises: self
                .exercises
                .into_iter()
                .filter(|exercise| !exercise.removed)
                .map(DraftExercise::into_exercise)
                .collect(),
        }
    }
}

/// Editable working copy of a workout plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDraft {
    /// Training goal.
    pub goal: String,
    /// Scheduled training days per week.
    pub days_per_week: i32,
    /// Editable days.
    pub days: Vec<DraftDay>,
    /// Set when the draft was cloned from a persisted plan; save then
    /// replaces that plan instead of inserting a new one.
    pub editing_plan_id: Option<i64>,
}

impl PlanDraft {
    /// Start an empty draft for manual entry.
    #[must_use]
    pub fn new(goal: impl Into<String>, days_per_week: i32) -> Self {
        Self {
            goal: goal.into(),
            days_per_week,
            days: Vec::new(),
            editing_plan_id: None,
        }
    }

    /// Clone a plan into an editable draft.
    ///
    /// A persisted plan carries its id, so saving the draft replaces it; a
    /// freshly generated plan has none, so saving inserts.
    #[must_use]
    pub fn from_plan(plan: &WorkoutPlan) -> Self {
        Self {
            goal: plan.goal.clone(),
            days_per_week: plan.days_per_week,
            days: plan.workout_days.iter().map(DraftDay::from_day).collect(),
            editing_plan_id: plan.id,
        }
    }

    /// Append a day with no exercises.
    pub fn push_day(&mut self, day_name: impl Into<String>, focus: Option<String>) {
        self.days.push(DraftDay {
            day_name: day_name.into(),
            focus,
            exercises: Vec::new(),
        });
    }

    /// Number of days in the draft.
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Append a blank exercise row to a day and return the new row's index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the day index is out of range.
    pub fn add_blank_exercise(&mut self, day_index: usize) -> AppResult<usize> {
        let day = self.day_mut(day_index)?;
        day.exercises.push(DraftExercise::blank());
        Ok(day.exercises.len() - 1)
    }

    /// Mutable access to one exercise row for field edits.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when either index is out of range.
    pub fn exercise_mut(
        &mut self,
        day_index: usize,
        exercise_index: usize,
    ) -> AppResult<&mut DraftExercise> {
        self.day_mut(day_index)?
            .exercises
            .get_mut(exercise_index)
            .ok_or_else(|| {
                AppError::invalid_input(format!("No exercise at position {exercise_index}"))
            })
    }

    /// Flip one row's removal flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when either index is out of range.
    pub fn toggle_removed(&mut self, day_index: usize, exercise_index: usize) -> AppResult<bool> {
        let exercise = self.exercise_mut(day_index, exercise_index)?;
        exercise.removed = !exercise.removed;
        Ok(exercise.removed)
    }

    /// Assemble the plan this draft describes.
    ///
    /// Rows marked removed are dropped and zero weights become absent.
    #[must_use]
    pub fn into_plan(self) -> WorkoutPlan {
        WorkoutPlan {
            id: self.editing_plan_id,
            user_email: None,
            goal: self.goal,
            days_per_week: self.days_per_week,
            workout_days: self.days.into_iter().map(DraftDay::into_day).collect(),
        }
    }

    fn day_mut(&mut self, day_index: usize) -> AppResult<&mut DraftDay> {
        self.days
            .get_mut(day_index)
            .ok_or_else(|| AppError::invalid_input(format!("No day at position {day_index}")))
    }
}
