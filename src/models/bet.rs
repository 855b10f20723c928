use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sentinel stored in `bets.result` until settlement.
pub const RESULT_PENDING: &str = "pending";

/// Database row for bets table.
///
/// `event_id` is NULL for standalone coin-flip plays. `result` is
/// `"pending"` until the bet is settled, then holds the declared outcome.
/// `balance_after` is the account balance right after the stake debit, and
/// for winners is updated to the post-credit balance at settlement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bet {
    pub id: Uuid,
    pub account_id: Uuid,
    pub event_id: Option<Uuid>,
    pub stake: i64,
    pub prediction: String,
    pub result: String,
    pub payout: i64,
    pub balance_after: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Bet {
    pub fn is_pending(&self) -> bool {
        self.result == RESULT_PENDING
    }
}
