// ABOUTME: Integration tests for account registration and login
// ABOUTME: Validates duplicate handling, credential checks, and enumeration resistance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_database, unique_email};
use ironplan::auth::CredentialStore;
use ironplan::errors::ErrorCode;

#[tokio::test]
async fn register_then_authenticate_round_trips() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database);
    let email = unique_email();

    store.register(&email, "pw123").await.expect("registration");

    let user = store
        .authenticate(&email, "pw123")
        .await
        .expect("login with the registered password");
    assert_eq!(user.email, email);
    // The stored hash is never the raw password.
    assert_ne!(user.password_hash, "pw123");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database);
    let email = unique_email();

    store.register(&email, "pw123").await.expect("registration");

    let err = store.authenticate(&email, "pw124").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database);
    let email = unique_email();

    store.register(&email, "pw123").await.expect("registration");

    let wrong_password = store.authenticate(&email, "nope").await.unwrap_err();
    let unknown_email = store
        .authenticate(&unique_email(), "nope")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.code, unknown_email.code);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn duplicate_registration_fails_the_second_time() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database);
    let email = unique_email();

    store.register(&email, "pw123").await.expect("first registration");

    let err = store.register(&email, "another-pw").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UserExists);
    assert!(err.message.contains(&email));

    // The original password still works after the failed attempt.
    store
        .authenticate(&email, "pw123")
        .await
        .expect("original credentials survive");
}

#[tokio::test]
async fn malformed_email_is_rejected_before_storage() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database.clone());

    let err = store.register("not-an-email", "pw123").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert!(database
        .get_user_by_email("not-an-email")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn empty_password_is_rejected() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database);

    let err = store.register(&unique_email(), "").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn hashes_are_salted_per_account() {
    let database = create_test_database().await;
    let store = CredentialStore::new(database.clone());
    let first = unique_email();
    let second = unique_email();

    store.register(&first, "pw123").await.expect("first");
    store.register(&second, "pw123").await.expect("second");

    let first_hash = database
        .get_user_by_email(&first)
        .await
        .expect("lookup")
        .expect("user")
        .password_hash;
    let second_hash = database
        .get_user_by_email(&second)
        .await
        .expect("lookup")
        .expect("user")
        .password_hash;
    assert_ne!(first_hash, second_hash);
}
