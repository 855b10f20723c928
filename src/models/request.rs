use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Kind of a manual wallet request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Deposit,
    Withdrawal,
}

impl RequestKind {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(RequestKind::Deposit),
            "withdrawal" => Some(RequestKind::Withdrawal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Deposit => "deposit",
            RequestKind::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database row for wallet_requests table.
///
/// status: pending | approved | rejected. Approval and the matching ledger
/// mutation commit in one database transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WalletRequest {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: String,
    pub amount: i64,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
}
