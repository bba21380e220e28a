//! Integration tests for `UsageRepo` and `StripeEventRepo`.

use sqlx::PgPool;
use teian_core::entitlement::status;
use teian_db::repositories::{StripeEventRepo, UsageRepo};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Test: counter starts at 1 on first generation and advances by one
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn record_generation_creates_row_and_increments(pool: PgPool) {
    let user_id = Uuid::new_v4();

    let usage = UsageRepo::record_generation(&pool, user_id).await.unwrap();
    assert_eq!(usage.proposals_created, 1);
    assert!(!usage.is_paid);

    let usage = UsageRepo::record_generation(&pool, user_id).await.unwrap();
    assert_eq!(usage.proposals_created, 2);

    let usage = UsageRepo::record_generation(&pool, user_id).await.unwrap();
    assert_eq!(usage.proposals_created, 3);
}

// ---------------------------------------------------------------------------
// Test: concurrent increments do not lose updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_increments_all_land(pool: PgPool) {
    let user_id = Uuid::new_v4();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            UsageRepo::record_generation(&pool, user_id).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(usage.proposals_created, 8);
}

// ---------------------------------------------------------------------------
// Test: checkout completion upserts entitlement fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn checkout_completed_marks_user_paid(pool: PgPool) {
    let user_id = Uuid::new_v4();

    UsageRepo::apply_checkout_completed(&pool, user_id, "cus_123", "sub_456")
        .await
        .unwrap();

    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert!(usage.is_paid);
    assert_eq!(usage.subscription_status.as_deref(), Some(status::ACTIVE));
    assert_eq!(usage.stripe_customer_id.as_deref(), Some("cus_123"));
    assert_eq!(usage.stripe_subscription_id.as_deref(), Some("sub_456"));
    // A user who paid before ever generating starts at zero.
    assert_eq!(usage.proposals_created, 0);
}

// ---------------------------------------------------------------------------
// Test: checkout on an existing row preserves the counter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn checkout_preserves_existing_counter(pool: PgPool) {
    let user_id = Uuid::new_v4();
    UsageRepo::record_generation(&pool, user_id).await.unwrap();
    UsageRepo::record_generation(&pool, user_id).await.unwrap();

    UsageRepo::apply_checkout_completed(&pool, user_id, "cus_123", "sub_456")
        .await
        .unwrap();

    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(usage.proposals_created, 2);
    assert!(usage.is_paid);
}

// ---------------------------------------------------------------------------
// Test: subscription deleted downgrades and clears the subscription id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn subscription_deleted_downgrades(pool: PgPool) {
    let user_id = Uuid::new_v4();
    UsageRepo::apply_checkout_completed(&pool, user_id, "cus_123", "sub_456")
        .await
        .unwrap();

    let updated = UsageRepo::apply_subscription_deleted(&pool, "cus_123")
        .await
        .unwrap();
    assert!(updated);

    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert!(!usage.is_paid);
    assert_eq!(usage.subscription_status.as_deref(), Some(status::CANCELLED));
    assert_eq!(usage.stripe_subscription_id, None);
    // The customer id survives so the billing portal still works.
    assert_eq!(usage.stripe_customer_id.as_deref(), Some("cus_123"));
}

// ---------------------------------------------------------------------------
// Test: subscription updated tracks is_paid from the reported status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn subscription_updated_tracks_status(pool: PgPool) {
    let user_id = Uuid::new_v4();
    UsageRepo::apply_checkout_completed(&pool, user_id, "cus_123", "sub_456")
        .await
        .unwrap();

    UsageRepo::apply_subscription_updated(&pool, "cus_123", "unpaid")
        .await
        .unwrap();
    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert!(!usage.is_paid);
    assert_eq!(usage.subscription_status.as_deref(), Some("unpaid"));

    UsageRepo::apply_subscription_updated(&pool, "cus_123", status::ACTIVE)
        .await
        .unwrap();
    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert!(usage.is_paid);
}

// ---------------------------------------------------------------------------
// Test: payment failure marks delinquency but leaves is_paid alone
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn payment_failed_sets_past_due(pool: PgPool) {
    let user_id = Uuid::new_v4();
    UsageRepo::apply_checkout_completed(&pool, user_id, "cus_123", "sub_456")
        .await
        .unwrap();

    UsageRepo::apply_payment_failed(&pool, "cus_123").await.unwrap();

    let usage = UsageRepo::find_by_user(&pool, user_id).await.unwrap().unwrap();
    assert!(usage.is_paid);
    assert_eq!(usage.subscription_status.as_deref(), Some(status::PAST_DUE));
}

// ---------------------------------------------------------------------------
// Test: events for unknown customers update nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn unknown_customer_is_a_no_op(pool: PgPool) {
    assert!(!UsageRepo::apply_subscription_deleted(&pool, "cus_ghost").await.unwrap());
    assert!(!UsageRepo::apply_payment_failed(&pool, "cus_ghost").await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: event id insert-is-the-lock
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn event_record_is_first_writer_wins(pool: PgPool) {
    let first = StripeEventRepo::try_record(&pool, "evt_1", "checkout.session.completed")
        .await
        .unwrap();
    assert!(first, "first delivery owns processing");

    let second = StripeEventRepo::try_record(&pool, "evt_1", "checkout.session.completed")
        .await
        .unwrap();
    assert!(!second, "duplicate delivery must be skipped");

    let other = StripeEventRepo::try_record(&pool, "evt_2", "invoice.payment_failed")
        .await
        .unwrap();
    assert!(other, "a distinct event id is unaffected");
}
