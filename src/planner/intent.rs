// ABOUTME: Routes a free-form request to the assistant that should handle it
// ABOUTME: Asks the backend for a small JSON verdict and validates it strictly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Intent Classification
//!
//! Before generating anything, the CLI asks the backend what the user is
//! actually requesting. The backend answers with a small JSON verdict naming
//! one of the supported assistants plus a confidence score; any other shape
//! is rejected as malformed.

use super::{PlanGenerator, SYSTEM_PROMPT};
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Assistants the classifier may route a request to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantKind {
    /// Weekly training plans.
    WorkoutPlanner,
    /// Meal and diet plans.
    NutritionPlanner,
}

impl AssistantKind {
    /// Wire name of the assistant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WorkoutPlanner => "workout_planner",
            Self::NutritionPlanner => "nutrition_planner",
        }
    }
}

impl std::fmt::Display for AssistantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated classification verdict for one user request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    /// Which assistant should handle the request.
    pub kind: AssistantKind,
    /// Backend confidence in the routing, between 0 and 1.
    pub confidence: f64,
    /// Cleaned-up restatement of what the user asked for.
    pub description: String,
}

/// Build the classification prompt for a free-form request.
#[must_use]
pub fn build_intent_prompt(request: &str) -> String {
    format!(
        r#"Classify the following request from a fitness client.

Request: {request}

Use this exact JSON format:
{{
  "assistant_type": "workout_planner" or "nutrition_planner",
  "confidence_score": 0.95,
  "description": "A cleaned up description of the assistance being requested"
}}

Respond ONLY with raw JSON.
Do not format it as a code block (no triple backticks)."#
    )
}

/// Classification JSON as the backend returns it, before validation.
#[derive(Debug, Deserialize)]
struct RawIntent {
    assistant_type: Option<String>,
    confidence_score: Option<f64>,
    description: Option<String>,
}

/// Parse and validate a classification verdict.
///
/// # Errors
///
/// Returns `MalformedPlan` when the text is not valid JSON, names an
/// unknown assistant, or carries a confidence outside `0..=1`.
pub fn parse_intent(text: &str) -> AppResult<IntentClassification> {
    let raw: RawIntent = serde_json::from_str(text.trim())
        .map_err(|e| AppError::malformed_plan(format!("not a valid classification: {e}")))?;

    let assistant_type = raw
        .assistant_type
        .ok_or_else(|| missing("assistant_type"))?;
    let kind = match assistant_type.as_str() {
        "workout_planner" => AssistantKind::WorkoutPlanner,
        "nutrition_planner" => AssistantKind::NutritionPlanner,
        other => {
            return Err(AppError::malformed_plan(format!(
                "unknown assistant_type: {other}"
            )));
        }
    };

    let confidence = raw
        .confidence_score
        .ok_or_else(|| missing("confidence_score"))?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(AppError::malformed_plan(format!(
            "confidence_score out of range: {confidence}"
        )));
    }

    let description = raw
        .description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| missing("description"))?;

    Ok(IntentClassification {
        kind,
        confidence,
        description,
    })
}

fn missing(field: &str) -> AppError {
    AppError::malformed_plan(format!("missing required field: {field}"))
}

impl PlanGenerator {
    /// Decide which assistant a free-form request is asking for.
    ///
    /// # Errors
    ///
    /// Returns `GenerationTimeout` when the deadline elapses,
    /// `GenerationFailed` when the backend reports an error, and
    /// `MalformedPlan` when the verdict does not match the expected shape.
    #[instrument(skip(self, request))]
    pub async fn classify_intent(&self, request: &str) -> AppResult<IntentClassification> {
        let chat = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_intent_prompt(request)),
        ]);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&chat))
            .await
            .map_err(|_| {
                AppError::generation_timeout(format!(
                    "Intent classification exceeded {}s",
                    self.timeout.as_secs()
                ))
            })??;

        let classification = parse_intent(&response.content)?;
        info!(
            kind = classification.kind.as_str(),
            confidence = classification.confidence,
            "request classified"
        );
        Ok(classification)
    }
}
