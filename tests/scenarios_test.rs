// ABOUTME: End-to-end scenarios covering the full register-generate-save-edit flow
// ABOUTME: Drives the session controller the way the interactive binary does
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use common::{create_test_controller, FakeProvider};
use ironplan::errors::ErrorCode;
use ironplan::models::NewProgress;
use std::sync::Arc;

const SQUAT_PLAN: &str = r#"{
  "goal": "lose weight",
  "days_per_week": 3,
  "workout_days": [
    {
      "day_name": "Day 1",
      "focus": "Legs",
      "exercises": [
        {"name": "Squat", "sets": 3, "reps": 10, "weight": null, "rest_time": 90}
      ]
    }
  ]
}"#;

#[tokio::test]
async fn register_login_generate_save_and_view() {
    let mut controller =
        create_test_controller(Arc::new(FakeProvider::returning(SQUAT_PLAN))).await;

    controller
        .register("a@x.com", "pw123")
        .await
        .expect("registration");
    controller.login("a@x.com", "pw123").await.expect("login");

    controller
        .generate_draft("lose weight", 3, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("save");

    let plans = controller.list_plans().await.expect("list");
    assert_eq!(plans.len(), 1);
    let (label, summary) = &plans[0];
    assert!(label.contains("lose weight"));
    assert!(label.contains("3 days/week"));
    assert_eq!(summary.id, plan_id);

    let plan = controller.view_plan(plan_id).await.expect("view");
    assert_eq!(plan.workout_days.len(), 1);
    assert_eq!(plan.workout_days[0].exercises.len(), 1);
    let squat = &plan.workout_days[0].exercises[0];
    assert_eq!(squat.name, "Squat");
    assert_eq!(squat.sets, 3);
    assert_eq!(squat.reps, 10);
    assert_eq!(squat.rest_time, Some(90));
    assert_eq!(squat.weight, None);
}

#[tokio::test]
async fn editing_swaps_squat_for_lunge() {
    let mut controller =
        create_test_controller(Arc::new(FakeProvider::returning(SQUAT_PLAN))).await;

    controller
        .register("a@x.com", "pw123")
        .await
        .expect("registration");
    controller.login("a@x.com", "pw123").await.expect("login");
    controller
        .generate_draft("lose weight", 3, 45)
        .await
        .expect("generate");
    let plan_id = controller.save_draft().await.expect("save");

    controller.edit_plan(plan_id).await.expect("edit");
    assert!(controller.toggle_exercise_removed(0, 0).expect("remove Squat"));
    let row = controller.add_blank_exercise(0).expect("add row");
    {
        let lunge = controller.draft_exercise_mut(0, row).expect("row");
        lunge.name = "Lunge".to_owned();
        lunge.sets = 3;
        lunge.reps = 12;
    }

    let saved_id = controller.save_draft().await.expect("replace save");
    assert_eq!(saved_id, plan_id);

    let plan = controller.view_plan(plan_id).await.expect("view");
    let names: Vec<&str> = plan.workout_days[0]
        .exercises
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, ["Lunge"]);
    assert_eq!(plan.workout_days[0].exercises[0].reps, 12);
}

#[tokio::test]
async fn progress_lifecycle_through_the_controller() {
    let mut controller =
        create_test_controller(Arc::new(FakeProvider::returning(SQUAT_PLAN))).await;

    controller
        .register("a@x.com", "pw123")
        .await
        .expect("registration");
    controller.login("a@x.com", "pw123").await.expect("login");

    let entry = controller
        .log_progress(&NewProgress {
            exercise_name: "Squat".to_owned(),
            day_name: "Day 1".to_owned(),
            sets_done: 3,
            reps_done: 10,
            weight_used: 0.0,
            notes: Some("first session".to_owned()),
        })
        .await
        .expect("log");
    let entry_id = entry.id.expect("id assigned");

    let listed = controller.list_progress().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].notes.as_deref(), Some("first session"));

    controller
        .update_progress(
            entry_id,
            &ironplan::models::ProgressUpdate {
                sets_done: 4,
                reps_done: 10,
                weight_used: 20.0,
                notes: None,
            },
        )
        .await
        .expect("update");

    let listed = controller.list_progress().await.expect("list");
    assert_eq!(listed[0].sets_done, 4);
    assert_eq!(listed[0].weight_used, 20.0);
    assert_eq!(listed[0].notes, None);

    controller.delete_progress(entry_id).await.expect("delete");
    assert!(controller.list_progress().await.expect("list").is_empty());

    let err = controller.delete_progress(entry_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
