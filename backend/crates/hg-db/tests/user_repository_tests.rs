mod common;

use common::{build_test_user, create_test_pool, create_test_user};

use hg_db::UserRepository;

use chrono::Utc;

use googletest::prelude::*;
use uuid::Uuid;

#[tokio::test]
async fn given_new_user_when_created_then_can_be_found_by_id_username_and_email() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = build_test_user("alice");
    repo.create(&user).await.unwrap();

    let by_id = repo.find_by_id(user.id).await.unwrap();
    let by_username = repo.find_by_username(&user.username).await.unwrap();
    let by_email = repo.find_by_email(&user.email).await.unwrap();

    assert_that!(by_id, some(anything()));
    assert_that!(by_username.unwrap().id, eq(user.id));
    assert_that!(by_email.unwrap().id, eq(user.id));

    let found = by_id.unwrap();
    assert_that!(found.username, eq(&user.username));
    assert_that!(found.email, eq(&user.email));
    assert_that!(found.is_active, eq(true));
    assert_that!(found.email_verified, eq(false));
    assert_that!(found.failed_login_attempts, eq(0));
}

#[tokio::test]
async fn given_taken_username_when_creating_then_unique_violation_is_reported() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    repo.create(&build_test_user("twin")).await.unwrap();

    let err = repo.create(&build_test_user("twin")).await.unwrap_err();
    assert_that!(err.is_unique_violation(), eq(true));
}

#[tokio::test]
async fn given_identifier_with_at_sign_when_finding_then_email_lookup_is_used() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "bob").await;

    let by_email = repo.find_by_identifier(&user.email).await.unwrap();
    let by_username = repo.find_by_identifier(&user.username).await.unwrap();

    assert_that!(by_email.unwrap().id, eq(user.id));
    assert_that!(by_username.unwrap().id, eq(user.id));
}

#[tokio::test]
async fn given_unknown_user_when_finding_then_returns_none() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let found = repo.find_by_id(Uuid::new_v4()).await.unwrap();

    assert_that!(found, none());
}

#[tokio::test]
async fn given_failed_logins_below_threshold_when_recorded_then_account_is_not_locked() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "carol").await;
    let now = Utc::now().timestamp();

    for _ in 0..6 {
        let locked = repo.record_failed_login(user.id, 7, 900, now).await.unwrap();
        assert_that!(locked, eq(false));
    }

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.failed_login_attempts, eq(6));
    assert_that!(found.account_locked_until, none());
}

#[tokio::test]
async fn given_failed_logins_at_threshold_when_recorded_then_account_locks() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "dave").await;
    let now = Utc::now().timestamp();

    for _ in 0..6 {
        repo.record_failed_login(user.id, 7, 900, now).await.unwrap();
    }
    let locked = repo.record_failed_login(user.id, 7, 900, now).await.unwrap();

    assert_that!(locked, eq(true));

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.failed_login_attempts, eq(7));
    assert_that!(found.account_locked_until, some(anything()));
    assert_that!(found.account_locked_until.unwrap().timestamp(), eq(now + 900));
    assert_that!(found.is_locked(), eq(true));
}

#[tokio::test]
async fn given_locked_account_when_login_succeeds_then_counter_and_lock_are_cleared() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "erin").await;
    let now = Utc::now().timestamp();

    for _ in 0..7 {
        repo.record_failed_login(user.id, 7, 900, now).await.unwrap();
    }

    repo.record_successful_login(user.id, "198.51.100.7", now)
        .await
        .unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.failed_login_attempts, eq(0));
    assert_that!(found.account_locked_until, none());
    assert_that!(found.last_login, some(anything()));
    assert_that!(found.last_login_ip, some(eq("198.51.100.7")));
}

#[tokio::test]
async fn given_expired_lock_when_sweeping_then_lock_and_counter_are_cleared() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "frank").await;
    let past = Utc::now().timestamp() - 2000;

    for _ in 0..7 {
        repo.record_failed_login(user.id, 7, 900, past).await.unwrap();
    }

    let cleared = repo.clear_expired_locks(Utc::now().timestamp()).await.unwrap();

    assert_that!(cleared, eq(1));
    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.failed_login_attempts, eq(0));
    assert_that!(found.account_locked_until, none());
}

#[tokio::test]
async fn given_verified_email_when_address_changes_then_verification_resets() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "grace").await;
    let now = Utc::now().timestamp();

    repo.set_email_verified(user.id, now).await.unwrap();
    let verified = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(verified.email_verified, eq(true));

    repo.update_email(user.id, "grace-new@example.com", now)
        .await
        .unwrap();

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.email, eq("grace-new@example.com"));
    assert_that!(found.email_verified, eq(false));
}

#[tokio::test]
async fn given_soft_deleted_user_then_identifiers_are_mangled_and_freed() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "henry").await;
    let now = Utc::now().timestamp();

    let deleted = repo.soft_delete(user.id, now).await.unwrap();
    assert_that!(deleted, eq(true));

    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.is_active, eq(false));
    assert_that!(
        found.username,
        eq(&format!("deleted_{}_{}", user.id, user.username))
    );
    assert_that!(
        found.email,
        eq(&format!("deleted_{}_{}", user.id, user.email))
    );

    // Original identifiers are free for a new registration
    let replacement = build_test_user("henry");
    assert_that!(repo.create(&replacement).await, ok(anything()));
}

#[tokio::test]
async fn given_already_deleted_user_when_deleted_again_then_nothing_changes() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "iris").await;
    let now = Utc::now().timestamp();

    repo.soft_delete(user.id, now).await.unwrap();
    let first = repo.find_by_id(user.id).await.unwrap().unwrap();

    let deleted_again = repo.soft_delete(user.id, now).await.unwrap();

    assert_that!(deleted_again, eq(false));
    let second = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(second.username, eq(&first.username));
    assert_that!(second.email, eq(&first.email));
}

#[tokio::test]
async fn given_duplicate_username_when_created_then_insert_fails() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "jack").await;

    let mut duplicate = build_test_user("jack2");
    duplicate.username = user.username.clone();

    assert_that!(repo.create(&duplicate).await, err(anything()));
}

#[tokio::test]
async fn given_stored_verification_token_when_verified_then_token_is_cleared() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "kate").await;
    let now = Utc::now().timestamp();

    repo.set_verification_token(user.id, "tok-abc", now).await.unwrap();

    let by_token = repo.find_by_verification_token("tok-abc").await.unwrap();
    assert_that!(by_token.unwrap().id, eq(user.id));

    repo.set_email_verified(user.id, now).await.unwrap();

    assert_that!(repo.find_by_verification_token("tok-abc").await.unwrap(), none());
    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.email_verified, eq(true));
    assert_that!(found.email_verification_token, none());
}

#[tokio::test]
async fn given_stored_reset_token_when_password_updates_then_token_is_cleared() {
    let pool = create_test_pool().await;
    let repo = UserRepository::new(pool.clone());

    let user = create_test_user(&pool, "liam").await;
    let now = Utc::now().timestamp();

    repo.set_reset_token(user.id, "reset-xyz", now + 3600, now)
        .await
        .unwrap();

    let by_token = repo.find_by_reset_token("reset-xyz").await.unwrap();
    assert_that!(by_token.unwrap().id, eq(user.id));

    repo.update_password(user.id, "$2b$12$newhash", now).await.unwrap();

    assert_that!(repo.find_by_reset_token("reset-xyz").await.unwrap(), none());
    let found = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_that!(found.password_reset_token, none());
    assert_that!(found.password_reset_expires, none());
}
