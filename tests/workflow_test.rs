// ABOUTME: Integration tests for the session workflow state machine
// ABOUTME: Verifies transitions, draft editing, and that failures leave sessions unchanged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_controller, logged_in_controller, unique_email, FakeProvider};
use ironplan::errors::{AppError, ErrorCode};
use ironplan::workflow::SessionState;
use std::sync::Arc;

const GENERATED_PLAN: &str = r#"{
  "goal": "lose weight",
  "days_per_week": 2,
  "workout_days": [
    {
      "day_name": "Day 1",
      "focus": "Legs",
      "exercises": [
        {"name": "Squat", "sets": 3, "reps": 10, "weight": null, "rest_time": 90}
      ]
    },
    {
      "day_name": "Day 2",
      "focus": "Upper Body",
      "exercises": [
        {"name": "Push Up", "sets": 3, "reps": 15, "weight": null, "rest_time": 60}
      ]
    }
  ]
}"#;

fn plan_provider() -> Arc<FakeProvider> {
    Arc::new(FakeProvider::returning(GENERATED_PLAN))
}

#[tokio::test]
async fn fresh_sessions_start_unauthenticated() {
    let controller = create_test_controller(plan_provider()).await;
    assert_eq!(*controller.state(), SessionState::Unauthenticated);
    assert!(controller.current_user().is_none());
}

#[tokio::test]
async fn plan_operations_require_a_login() {
    let controller = create_test_controller(plan_provider()).await;

    let err = controller.list_plans().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);

    let err = controller.list_progress().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
}

#[tokio::test]
async fn login_moves_to_viewing_and_logout_resets() {
    let mut controller = create_test_controller(plan_provider()).await;
    let email = unique_email();
    controller.register(&email, "pw123").await.expect("register");

    // Registration alone does not authenticate.
    assert_eq!(*controller.state(), SessionState::Unauthenticated);

    controller.login(&email, "pw123").await.expect("login");
    assert_eq!(controller.current_user(), Some(email.as_str()));
    assert!(matches!(controller.state(), SessionState::Viewing { .. }));

    controller.logout();
    assert_eq!(*controller.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn failed_login_leaves_the_session_unauthenticated() {
    let mut controller = create_test_controller(plan_provider()).await;
    let email = unique_email();
    controller.register(&email, "pw123").await.expect("register");

    let err = controller.login(&email, "wrong").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
    assert_eq!(*controller.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn generated_draft_opens_in_the_editing_state() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");

    let draft = controller.draft().expect("draft open");
    assert_eq!(draft.goal, "lose weight");
    assert_eq!(draft.day_count(), 2);
    assert_eq!(draft.editing_plan_id, None);
    assert_eq!(draft.days[0].exercises[0].name, "Squat");
}

#[tokio::test]
async fn generation_failure_keeps_the_session_viewing() {
    let provider = Arc::new(FakeProvider::failing(AppError::generation("down")));
    let (mut controller, _) = logged_in_controller(provider).await;

    let err = controller
        .generate_draft("lose weight", 3, 45)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GenerationFailed);
    assert!(matches!(controller.state(), SessionState::Viewing { .. }));
    assert!(controller.draft().is_none());
}

#[tokio::test]
async fn malformed_generation_keeps_the_session_viewing() {
    let provider = Arc::new(FakeProvider::returning("Sure! Here's your plan:"));
    let (mut controller, _) = logged_in_controller(provider).await;

    let err = controller
        .generate_draft("lose weight", 3, 45)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedPlan);
    assert!(matches!(controller.state(), SessionState::Viewing { .. }));
}

#[tokio::test]
async fn out_of_range_day_counts_are_rejected_before_generation() {
    let provider = plan_provider();
    let (mut controller, _) = logged_in_controller(Arc::clone(&provider)).await;

    let err = controller.generate_draft("goal", 0, 45).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = controller.generate_draft("goal", 8, 45).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    // The backend was never consulted.
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn saving_a_generated_draft_inserts_a_new_plan() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("save");

    assert!(matches!(controller.state(), SessionState::Viewing { .. }));

    let plans = controller.list_plans().await.expect("list");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].1.id, plan_id);
    assert!(plans[0].0.contains("lose weight"));
    assert!(plans[0].0.contains("2 days/week"));
}

#[tokio::test]
async fn manual_draft_builds_the_same_plan_shape() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .start_manual_draft(
            "gain muscle",
            vec![
                ("Day 1".to_owned(), Some("Push".to_owned())),
                ("Day 2".to_owned(), None),
            ],
        )
        .expect("manual draft");

    // First day gets one exercise, named after the blank row is appended.
    let row = controller.add_blank_exercise(0).expect("add row");
    let exercise = controller.draft_exercise_mut(0, row).expect("row access");
    exercise.name = "Bench Press".to_owned();
    assert_eq!(exercise.sets, 3);
    assert_eq!(exercise.reps, 10);
    assert_eq!(exercise.rest_time, Some(60));

    let plan_id = controller.save_draft().await.expect("save");
    let plan = controller.view_plan(plan_id).await.expect("view");
    assert_eq!(plan.goal, "gain muscle");
    assert_eq!(plan.workout_days.len(), 2);
    assert_eq!(plan.workout_days[0].exercises[0].name, "Bench Press");
    assert!(plan.workout_days[1].exercises.is_empty());
}

#[tokio::test]
async fn unnamed_kept_rows_block_the_save_and_keep_the_draft() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .start_manual_draft("strength", vec![("Day 1".to_owned(), None)])
        .expect("manual draft");
    controller.add_blank_exercise(0).expect("add row");

    let err = controller.save_draft().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.message.contains("Day 1"));

    // Still editing; fixing the row makes the save go through.
    let draft = controller.draft().expect("draft kept");
    assert_eq!(draft.day_count(), 1);
    controller.draft_exercise_mut(0, 0).expect("row").name = "Row".to_owned();
    controller.save_draft().await.expect("save after fix");
}

#[tokio::test]
async fn editing_a_saved_plan_replaces_it_on_save() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("first save");

    controller.edit_plan(plan_id).await.expect("edit");
    let draft = controller.draft().expect("draft open");
    assert_eq!(draft.editing_plan_id, Some(plan_id));

    // Remove Squat, add Lunge.
    assert!(controller.toggle_exercise_removed(0, 0).expect("toggle"));
    let row = controller.add_blank_exercise(0).expect("add row");
    let exercise = controller.draft_exercise_mut(0, row).expect("row");
    exercise.name = "Lunge".to_owned();
    exercise.reps = 12;

    let saved_id = controller.save_draft().await.expect("replace save");
    assert_eq!(saved_id, plan_id);

    let plan = controller.view_plan(plan_id).await.expect("view");
    let day1_names: Vec<&str> = plan.workout_days[0]
        .exercises
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(day1_names, ["Lunge"]);
    assert_eq!(controller.list_plans().await.expect("list").len(), 1);
}

#[tokio::test]
async fn discarding_a_draft_changes_nothing_persisted() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("save");

    controller.edit_plan(plan_id).await.expect("edit");
    controller.toggle_exercise_removed(0, 0).expect("toggle");
    controller.discard_draft().expect("discard");

    let plan = controller.view_plan(plan_id).await.expect("view");
    assert_eq!(plan.workout_days[0].exercises[0].name, "Squat");
}

#[tokio::test]
async fn delete_requires_confirmation_and_cancel_keeps_the_plan() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("save");

    controller.request_delete(plan_id).expect("request delete");
    assert!(matches!(
        controller.state(),
        SessionState::ConfirmingDelete { .. }
    ));

    controller.cancel_delete().expect("cancel");
    assert!(matches!(controller.state(), SessionState::Viewing { .. }));
    assert_eq!(controller.list_plans().await.expect("list").len(), 1);

    controller.request_delete(plan_id).expect("request again");
    controller.confirm_delete().await.expect("confirm");
    assert!(matches!(controller.state(), SessionState::Viewing { .. }));
    assert!(controller.list_plans().await.expect("list").is_empty());
}

#[tokio::test]
async fn confirming_without_a_pending_delete_is_invalid() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    let err = controller.confirm_delete().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    let err = controller.cancel_delete().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn viewing_another_users_plan_is_not_found() {
    let (mut owner, _) = logged_in_controller(plan_provider()).await;
    owner
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");
    let plan_id = owner.save_draft().await.expect("save");

    // Different controller, different database, same id space: the plan id
    // simply does not exist for this user.
    let (other, _) = logged_in_controller(plan_provider()).await;
    let err = other.view_plan(plan_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn browsing_is_blocked_while_a_draft_is_open() {
    let (mut controller, _) = logged_in_controller(plan_provider()).await;

    controller
        .generate_draft("lose weight", 2, 45)
        .await
        .expect("generate");

    let err = controller.list_plans().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    controller.discard_draft().expect("discard");
    controller.list_plans().await.expect("list after discard");
}
