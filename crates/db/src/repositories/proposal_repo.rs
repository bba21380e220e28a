//! Repository for the `proposals` table.
//!
//! Every read and write is scoped to the owning user; there is no way to
//! reach another user's proposal through this interface.

use sqlx::PgPool;
use teian_core::types::UserId;
use uuid::Uuid;

use crate::models::proposal::Proposal;

/// Column list for proposals queries.
const COLUMNS: &str = "id, user_id, input, output, created_at";

pub struct ProposalRepo;

impl ProposalRepo {
    /// Insert a new proposal, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &serde_json::Value,
        output: &serde_json::Value,
    ) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals (user_id, input, output)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(user_id)
            .bind(input)
            .bind(output)
            .fetch_one(pool)
            .await
    }

    /// List a user's proposals, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find one proposal by id, only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: UserId,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a proposal by compound (id, owner) match.
    /// Returns `false` when the id does not exist or belongs to another user.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM proposals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
