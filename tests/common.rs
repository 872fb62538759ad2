// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, credential, and fake-provider helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Shared test utilities for `ironplan`
//!
//! Common setup functions to reduce duplication across integration tests.

use async_trait::async_trait;
use ironplan::{
    auth::CredentialStore,
    database::Database,
    errors::AppError,
    llm::{ChatRequest, ChatResponse, LlmProvider},
    models::{Exercise, WorkoutDay, WorkoutPlan},
    planner::PlanGenerator,
    workflow::SessionController,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Email nobody else in the test process is using
pub fn unique_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4())
}

/// Register an account and return its email
pub async fn create_test_user(database: &Database) -> String {
    let email = unique_email();
    CredentialStore::new(database.clone())
        .register(&email, "pw123")
        .await
        .expect("Failed to register test user");
    email
}

/// Two-day plan with three exercises, unsaved
pub fn sample_plan() -> WorkoutPlan {
    let mut plan = WorkoutPlan::new("Build muscle", 2);
    let mut day1 = WorkoutDay::new("Day 1", Some("Chest & Triceps".to_owned()));
    day1.exercises.push(Exercise {
        id: None,
        name: "Bench Press".to_owned(),
        sets: 3,
        reps: 10,
        rest_time: Some(90),
        weight: Some(60.0),
    });
    day1.exercises.push(Exercise {
        id: None,
        name: "Dips".to_owned(),
        sets: 3,
        reps: 12,
        rest_time: Some(60),
        weight: None,
    });
    let mut day2 = WorkoutDay::new("Day 2", Some("Legs".to_owned()));
    day2.exercises.push(Exercise {
        id: None,
        name: "Squat".to_owned(),
        sets: 5,
        reps: 5,
        rest_time: Some(120),
        weight: Some(100.0),
    });
    plan.workout_days.push(day1);
    plan.workout_days.push(day2);
    plan
}

/// Fake chat backend: returns canned responses in order, then repeats the
/// last one. Records every request it receives.
pub struct FakeProvider {
    responses: Vec<Result<String, AppError>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeProvider {
    pub fn returning(text: &str) -> Self {
        Self::with_responses(vec![Ok(text.to_owned())])
    }

    pub fn failing(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        assert!(!responses.is_empty(), "FakeProvider needs a response");
        Self {
            responses,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn display_name(&self) -> &'static str {
        "Fake Provider"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.responses.len() - 1);
        match &self.responses[index] {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "fake-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Err(error) => Err(AppError::new(error.code, error.message.clone())),
        }
    }
}

/// Generator over a fake provider with a generous deadline
pub fn fake_generator(provider: Arc<FakeProvider>) -> PlanGenerator {
    PlanGenerator::new(provider, Duration::from_secs(5))
}

/// Controller wired to an in-memory database and the given fake provider
pub async fn create_test_controller(provider: Arc<FakeProvider>) -> SessionController {
    let database = create_test_database().await;
    let credentials = CredentialStore::new(database.clone());
    SessionController::new(database, credentials, fake_generator(provider))
}

/// Controller already logged in as a fresh user; returns the email too
pub async fn logged_in_controller(provider: Arc<FakeProvider>) -> (SessionController, String) {
    let database = create_test_database().await;
    let email = create_test_user(&database).await;
    let credentials = CredentialStore::new(database.clone());
    let mut controller = SessionController::new(database, credentials, fake_generator(provider));
    controller
        .login(&email, "pw123")
        .await
        .expect("Failed to log in test user");
    (controller, email)
}
