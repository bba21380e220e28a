//! Row type for the `proposals` table.

use serde::Serialize;
use teian_core::types::{Timestamp, UserId};
use uuid::Uuid;

/// A persisted proposal: the submitted input and the generated output,
/// both stored as their wire-format JSON documents.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Proposal {
    pub id: Uuid,
    pub user_id: UserId,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    pub created_at: Timestamp,
}
