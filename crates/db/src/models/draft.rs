//! Row type for the `proposal_drafts` resume-token table.

use serde::Serialize;
use teian_core::types::Timestamp;
use uuid::Uuid;

/// A pending proposal input parked across the login redirect.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProposalDraft {
    pub token: Uuid,
    pub input: serde_json::Value,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
