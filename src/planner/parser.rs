// ABOUTME: Structural validation of generated plan text into the plan tree
// ABOUTME: Strict about required fields, lenient about optional ones, names the field on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Plan Parsing
//!
//! Turns raw model output into a [`WorkoutPlan`]. Every required field is
//! checked by name so a failure message points at what the model got
//! wrong; optional fields pass through as `None`. Parsed plans carry no
//! identity or owner; those are assigned at save time.

use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, WorkoutDay, WorkoutPlan};
use serde::Deserialize;

/// Loosely typed plan as the model emits it.
#[derive(Debug, Deserialize)]
struct RawPlan {
    goal: Option<String>,
    days_per_week: Option<i32>,
    workout_days: Option<Vec<RawDay>>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
    day_name: Option<String>,
    focus: Option<String>,
    exercises: Option<Vec<RawExercise>>,
}

#[derive(Debug, Deserialize)]
struct RawExercise {
    name: Option<String>,
    sets: Option<i32>,
    reps: Option<i32>,
    weight: Option<f64>,
    rest_time: Option<i32>,
}

/// Parse generated plan text into a plan tree.
///
/// # Errors
///
/// Returns `MalformedPlan` when the text is not JSON or a required field
/// is missing; the message names the offending field.
pub fn parse_plan(text: &str) -> AppResult<WorkoutPlan> {
    let raw: RawPlan = serde_json::from_str(text.trim())
        .map_err(|e| AppError::malformed_plan(format!("not valid plan JSON: {e}")))?;

    let goal = raw
        .goal
        .filter(|goal| !goal.trim().is_empty())
        .ok_or_else(|| missing("goal"))?;
    let days_per_week = raw.days_per_week.ok_or_else(|| missing("days_per_week"))?;
    let raw_days = raw.workout_days.ok_or_else(|| missing("workout_days"))?;

    let mut workout_days = Vec::with_capacity(raw_days.len());
    for (day_index, raw_day) in raw_days.into_iter().enumerate() {
        let day_name = raw_day
            .day_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| missing(&format!("workout_days[{day_index}].day_name")))?;
        let raw_exercises = raw_day
            .exercises
            .ok_or_else(|| missing(&format!("workout_days[{day_index}].exercises")))?;

        let mut exercises = Vec::with_capacity(raw_exercises.len());
        for (exercise_index, raw_exercise) in raw_exercises.into_iter().enumerate() {
            let path = format!("workout_days[{day_index}].exercises[{exercise_index}]");
            exercises.push(Exercise {
                id: None,
                name: raw_exercise
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .ok_or_else(|| missing(&format!("{path}.name")))?,
                sets: raw_exercise
                    .sets
                    .ok_or_else(|| missing(&format!("{path}.sets")))?,
                reps: raw_exercise
                    .reps
                    .ok_or_else(|| missing(&format!("{path}.reps")))?,
                rest_time: raw_exercise.rest_time,
                weight: raw_exercise.weight,
            });
        }

        workout_days.push(WorkoutDay {
            id: None,
            day_name,
            focus: raw_day.focus,
            exercises,
        });
    }

    Ok(WorkoutPlan {
        id: None,
        user_email: None,
        goal,
        days_per_week,
        workout_days,
    })
}

fn missing(field: &str) -> AppError {
    AppError::malformed_plan(format!("missing required field: {field}"))
}
