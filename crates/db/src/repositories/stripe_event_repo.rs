//! Repository for the `stripe_events` idempotency table.

use sqlx::PgPool;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

pub struct StripeEventRepo;

impl StripeEventRepo {
    /// Record an event id, insert-is-the-lock style.
    ///
    /// Returns `Ok(true)` when this call inserted the row and therefore owns
    /// processing of the event. Returns `Ok(false)` when the id was already
    /// recorded, including when a concurrent delivery won the race: a unique
    /// violation on the insert is proof another request owns it.
    pub async fn try_record(
        pool: &PgPool,
        event_id: &str,
        event_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("INSERT INTO stripe_events (event_id, event_type) VALUES ($1, $2)")
            .bind(event_id)
            .bind(event_type)
            .execute(pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }
}
