//! Balance and transaction ledger.
//!
//! Every balance mutation in the crate goes through [`debit`] or
//! [`credit`]. Both run on a caller-supplied database transaction so the
//! companion state change (bet insert, settlement update, request
//! approval) commits atomically with the ledger write, and both record
//! exactly one `transactions` row carrying a `balance_after` snapshot.

use sqlx::Postgres;
use uuid::Uuid;

use crate::models::Transaction;

/// What caused a ledger mutation; linked on the transaction row.
#[derive(Debug, Clone, Copy)]
pub enum TxnContext {
    Bet(Uuid),
    Request(Uuid),
    Manual,
}

impl TxnContext {
    fn bet_id(&self) -> Option<Uuid> {
        match self {
            TxnContext::Bet(id) => Some(*id),
            _ => None,
        }
    }

    fn request_id(&self) -> Option<Uuid> {
        match self {
            TxnContext::Request(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(Uuid),

    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("ledger amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Debit `amount` minor units from an account.
///
/// The balance check and decrement are one conditional UPDATE, so two
/// interleaved debits can never both succeed against the same funds.
pub async fn debit(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    account_id: Uuid,
    amount: i64,
    performed_by: Uuid,
    context: TxnContext,
) -> Result<Transaction, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let updated: Option<(i64,)> = sqlx::query_as(
        "UPDATE accounts SET balance = balance - $2 WHERE id = $1 AND balance >= $2 RETURNING balance",
    )
    .bind(account_id)
    .bind(amount)
    .fetch_optional(&mut **tx)
    .await?;

    let balance_after = match updated {
        Some((balance,)) => balance,
        None => {
            let existing: Option<(i64,)> =
                sqlx::query_as("SELECT balance FROM accounts WHERE id = $1")
                    .bind(account_id)
                    .fetch_optional(&mut **tx)
                    .await?;

            return Err(match existing {
                Some((available,)) => LedgerError::InsufficientFunds {
                    available,
                    required: amount,
                },
                None => LedgerError::AccountNotFound(account_id),
            });
        }
    };

    let entry = record(tx, account_id, -amount, balance_after, performed_by, context).await?;

    tracing::debug!(
        account_id = %account_id,
        amount = amount,
        balance_after = balance_after,
        "Ledger: debit applied"
    );

    Ok(entry)
}

/// Credit `amount` minor units to an account.
pub async fn credit(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    account_id: Uuid,
    amount: i64,
    performed_by: Uuid,
    context: TxnContext,
) -> Result<Transaction, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let updated: Option<(i64,)> = sqlx::query_as(
        "UPDATE accounts SET balance = balance + $2 WHERE id = $1 RETURNING balance",
    )
    .bind(account_id)
    .bind(amount)
    .fetch_optional(&mut **tx)
    .await?;

    let balance_after = match updated {
        Some((balance,)) => balance,
        None => return Err(LedgerError::AccountNotFound(account_id)),
    };

    let entry = record(tx, account_id, amount, balance_after, performed_by, context).await?;

    tracing::debug!(
        account_id = %account_id,
        amount = amount,
        balance_after = balance_after,
        "Ledger: credit applied"
    );

    Ok(entry)
}

/// Append the audit row for a mutation that was just applied.
async fn record(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    account_id: Uuid,
    amount: i64,
    balance_after: i64,
    performed_by: Uuid,
    context: TxnContext,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (account_id, amount, balance_after, performed_by, bet_id, request_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(amount)
    .bind(balance_after)
    .bind(performed_by)
    .bind(context.bet_id())
    .bind(context.request_id())
    .fetch_one(&mut **tx)
    .await
}
