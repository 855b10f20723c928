use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for transactions table.
///
/// Append-only. `amount` is signed (debits negative), `balance_after` is
/// the account balance immediately after this mutation was applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: i64,
    pub balance_after: i64,
    pub performed_by: Uuid,
    pub bet_id: Option<Uuid>,
    pub request_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}
