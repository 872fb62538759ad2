// ABOUTME: Workout plan generation through a chat-completion backend
// ABOUTME: Builds the deterministic generation prompt and enforces a hard deadline on the round trip
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Plan Generation
//!
//! [`PlanGenerator`] turns a goal and weekly schedule into raw plan text by
//! prompting a chat-completion backend. The prompt is a pure function of
//! its inputs, the round trip runs under a hard deadline, and the returned
//! text goes to [`parser`] for structural validation before anything else
//! touches it.

pub mod intent;
pub mod parser;

pub use intent::{AssistantKind, IntentClassification};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// System message sent with every generation request.
const SYSTEM_PROMPT: &str =
    "You are a fitness trainer looking to help your client achieve their goals.";

/// Build the generation prompt for a goal and weekly schedule.
///
/// The prompt depends only on its arguments, so identical requests produce
/// identical prompts. The embedded example shows the model the exact JSON
/// shape the parser accepts.
#[must_use]
pub fn build_plan_prompt(goal: &str, days_per_week: i32, session_minutes: u32) -> String {
    format!(
        r#"Act as a certified personal trainer. Create a structured weekly workout plan in JSON format only.

Details:
- Goal: {goal}
- Training Days: {days_per_week}
- Session Length: {session_minutes} minutes
- Assume the user is intermediate to advanced

Use this exact JSON format:
{{
  "goal": "{goal}",
  "days_per_week": {days_per_week},
  "workout_days": [
    {{
      "day_name": "Day 1",
      "focus": "Chest & Triceps",
      "exercises": [
        {{
          "name": "Bench Press",
          "sets": 3,
          "reps": 10,
          "weight": null,
          "rest_time": 90
        }},
        ...
      ]
    }},
    ...
  ]
}}

Respond ONLY with raw JSON.
Do NOT say anything like "Here is your plan" or "Sure, here's your workout".
Just return the JSON directly, and nothing else.
Do not format it as a code block (no triple backticks)."#
    )
}

/// Generates workout plans through an LLM provider.
///
/// The provider is treated as an opaque text service; parsing and
/// persistence happen elsewhere.
pub struct PlanGenerator {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl PlanGenerator {
    /// Create a generator with the given provider and round-trip deadline.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Deadline applied to each backend round trip.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate raw plan text for a goal and weekly schedule.
    ///
    /// # Errors
    ///
    /// Returns `GenerationTimeout` when the deadline elapses and
    /// `GenerationFailed` when the backend reports an error.
    #[instrument(skip(self))]
    pub async fn generate_plan_text(
        &self,
        goal: &str,
        days_per_week: i32,
        session_minutes: u32,
    ) -> AppResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_plan_prompt(goal, days_per_week, session_minutes)),
        ])
        .with_temperature(defaults::GENERATION_TEMPERATURE);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| {
                AppError::generation_timeout(format!(
                    "Plan generation exceeded {}s",
                    self.timeout.as_secs()
                ))
            })??;

        info!(
            provider = self.provider.name(),
            bytes = response.content.len(),
            "plan text generated"
        );
        Ok(response.content)
    }
}
