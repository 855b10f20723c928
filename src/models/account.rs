use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for accounts table.
///
/// `balance` is in minor currency units and is only ever mutated through
/// `crate::ledger`, so it always equals the sum of the account's
/// transaction amounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub balance: i64,
    pub assigned_to: Option<Uuid>,
    pub is_blocked: bool,
    pub created_at: Option<DateTime<Utc>>,
}
