// ABOUTME: Named constants for defaults and validation limits used across the crate
// ABOUTME: Keeps magic numbers out of business logic and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Crate-wide constants.

/// Default values applied when the environment or the user leaves a knob unset.
pub mod defaults {
    /// Base URL for the OpenAI-compatible chat completions API
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

    /// Model requested when `OPENAI_MODEL` is unset
    pub const OPENAI_MODEL: &str = "gpt-4o";

    /// Upper bound on one plan generation round trip, in seconds
    pub const GENERATION_TIMEOUT_SECS: u64 = 60;

    /// Sampling temperature for plan generation requests
    pub const GENERATION_TEMPERATURE: f32 = 0.7;

    /// Session length assumed when building the generation prompt, in minutes
    pub const SESSION_LENGTH_MINUTES: u32 = 60;

    /// Sets pre-filled on a manually added exercise
    pub const EXERCISE_SETS: i32 = 3;

    /// Reps pre-filled on a manually added exercise
    pub const EXERCISE_REPS: i32 = 10;

    /// Rest period pre-filled on a manually added exercise, in seconds
    pub const EXERCISE_REST_SECS: i32 = 60;

    /// Log level used when `RUST_LOG` is unset
    pub const LOG_LEVEL: &str = "info";
}

/// Validation limits enforced on user input.
pub mod limits {
    /// Shortest plausible email address (`a@b.co`)
    pub const MIN_EMAIL_LENGTH: usize = 6;

    /// Fewest training days a plan may schedule
    pub const MIN_DAYS_PER_WEEK: i32 = 1;

    /// Most training days a plan may schedule
    pub const MAX_DAYS_PER_WEEK: i32 = 7;
}
