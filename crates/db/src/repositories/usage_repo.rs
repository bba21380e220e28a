//! Repository for the `user_usage` table.
//!
//! The generation path only ever calls [`UsageRepo::find_by_user`] and
//! [`UsageRepo::record_generation`]; the `apply_*` methods are reserved for
//! the billing webhook synchronizer.

use sqlx::PgPool;
use teian_core::entitlement::status;
use teian_core::types::UserId;

use crate::models::usage::UserUsage;

/// Column list for user_usage queries.
const COLUMNS: &str = "user_id, proposals_created, is_paid, subscription_status, \
    stripe_customer_id, stripe_subscription_id, created_at, updated_at";

pub struct UsageRepo;

impl UsageRepo {
    /// Find a user's usage record, if one exists yet.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<UserUsage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_usage WHERE user_id = $1");
        sqlx::query_as::<_, UserUsage>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Advance the lifetime generation counter by exactly one.
    ///
    /// The increment is atomic at the storage layer (read-modify-write in a
    /// single statement), so concurrent requests cannot lose an update.
    /// Creates the usage row lazily on a user's first generation.
    pub async fn record_generation(pool: &PgPool, user_id: UserId) -> Result<UserUsage, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_usage (user_id, proposals_created)
             VALUES ($1, 1)
             ON CONFLICT (user_id) DO UPDATE SET
                proposals_created = user_usage.proposals_created + 1,
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserUsage>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Record a completed checkout: the user is now an active subscriber.
    /// Creates the usage row if the user never generated before paying.
    pub async fn apply_checkout_completed(
        pool: &PgPool,
        user_id: UserId,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_usage
                (user_id, is_paid, subscription_status, stripe_customer_id, stripe_subscription_id)
             VALUES ($1, TRUE, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                is_paid = TRUE,
                subscription_status = EXCLUDED.subscription_status,
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                updated_at = now()",
        )
        .bind(user_id)
        .bind(status::ACTIVE)
        .bind(customer_id)
        .bind(subscription_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The subscription was deleted at the provider. Returns `true` if a
    /// matching record was updated.
    pub async fn apply_subscription_deleted(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_usage SET
                is_paid = FALSE,
                subscription_status = $1,
                stripe_subscription_id = NULL,
                updated_at = now()
             WHERE stripe_customer_id = $2",
        )
        .bind(status::CANCELLED)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The subscription changed state at the provider. `is_paid` tracks
    /// whether the reported status is `active`.
    pub async fn apply_subscription_updated(
        pool: &PgPool,
        customer_id: &str,
        subscription_status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_usage SET
                is_paid = ($1 = $2),
                subscription_status = $1,
                updated_at = now()
             WHERE stripe_customer_id = $3",
        )
        .bind(subscription_status)
        .bind(status::ACTIVE)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// An invoice payment failed; the subscription is delinquent.
    /// `is_paid` is left untouched until the provider settles the state.
    pub async fn apply_payment_failed(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_usage SET
                subscription_status = $1,
                updated_at = now()
             WHERE stripe_customer_id = $2",
        )
        .bind(status::PAST_DUE)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
