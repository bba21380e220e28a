//! Repository for the `proposal_drafts` resume-token table.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::draft::ProposalDraft;

/// Column list for proposal_drafts queries.
const COLUMNS: &str = "token, input, expires_at, created_at";

pub struct DraftRepo;

impl DraftRepo {
    /// Park a pending input, returning the created draft with its token.
    pub async fn create(
        pool: &PgPool,
        input: &serde_json::Value,
        ttl_secs: i64,
    ) -> Result<ProposalDraft, sqlx::Error> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        let query = format!(
            "INSERT INTO proposal_drafts (input, expires_at)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalDraft>(&query)
            .bind(input)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Consume a draft: delete-and-return in one statement so a token can
    /// only ever be redeemed once. Expired drafts are not returned.
    pub async fn take(pool: &PgPool, token: Uuid) -> Result<Option<ProposalDraft>, sqlx::Error> {
        let query = format!(
            "DELETE FROM proposal_drafts
             WHERE token = $1 AND expires_at > now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalDraft>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Delete expired drafts, returning how many were removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM proposal_drafts WHERE expires_at <= now()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
