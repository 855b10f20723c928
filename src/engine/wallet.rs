//! Manual wallet workflow: deposit/withdrawal requests and direct
//! operator adjustments. Approval and its ledger mutation commit as one
//! database transaction; a failed debit leaves the request pending.

use metrics::counter;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{account_repo, request_repo};
use crate::engine::EngineError;
use crate::ledger::{self, TxnContext};
use crate::models::{RequestKind, Transaction, WalletRequest};

/// File a deposit or withdrawal request for operator review.
pub async fn create_request(
    pool: &PgPool,
    account_id: Uuid,
    kind: RequestKind,
    amount: i64,
) -> Result<WalletRequest, EngineError> {
    if amount <= 0 {
        return Err(EngineError::NonPositiveAmount);
    }

    let account = account_repo::get_account(pool, account_id)
        .await?
        .ok_or(EngineError::AccountNotFound)?;
    if account.is_blocked {
        return Err(EngineError::AccountBlocked);
    }

    let request = request_repo::insert_request(pool, account_id, kind.as_str(), amount).await?;

    tracing::info!(
        request_id = %request.id,
        account_id = %account_id,
        kind = %kind,
        amount = amount,
        "Wallet request filed"
    );

    Ok(request)
}

/// Approve a pending request, applying the matching ledger mutation.
///
/// A withdrawal that would overdraw the account fails the whole
/// transaction: no money moves and the request stays pending.
pub async fn approve_request(
    pool: &PgPool,
    request_id: Uuid,
    reviewed_by: Uuid,
) -> Result<WalletRequest, EngineError> {
    let request = request_repo::get_request(pool, request_id)
        .await?
        .ok_or(EngineError::RequestNotFound)?;

    let kind = RequestKind::from_db_str(&request.kind)
        .ok_or_else(|| EngineError::CorruptRow(format!("unknown request kind {:?}", request.kind)))?;

    let account = account_repo::get_account(pool, request.account_id)
        .await?
        .ok_or(EngineError::AccountNotFound)?;
    if account.is_blocked {
        return Err(EngineError::AccountBlocked);
    }

    let mut tx = pool.begin().await?;
    if !request_repo::mark_reviewed(&mut tx, request_id, "approved", reviewed_by).await? {
        return Err(EngineError::RequestNotPending);
    }
    let context = TxnContext::Request(request_id);
    match kind {
        RequestKind::Deposit => {
            ledger::credit(&mut tx, request.account_id, request.amount, reviewed_by, context)
                .await?;
        }
        RequestKind::Withdrawal => {
            ledger::debit(&mut tx, request.account_id, request.amount, reviewed_by, context)
                .await?;
        }
    }
    tx.commit().await?;

    counter!("wallet_requests_approved_total").increment(1);
    tracing::info!(
        request_id = %request_id,
        account_id = %request.account_id,
        kind = %kind,
        amount = request.amount,
        reviewed_by = %reviewed_by,
        "Wallet request approved"
    );

    request_repo::get_request(pool, request_id)
        .await?
        .ok_or(EngineError::RequestNotFound)
}

/// Reject a pending request. No ledger mutation.
pub async fn reject_request(
    pool: &PgPool,
    request_id: Uuid,
    reviewed_by: Uuid,
) -> Result<WalletRequest, EngineError> {
    request_repo::get_request(pool, request_id)
        .await?
        .ok_or(EngineError::RequestNotFound)?;

    let mut tx = pool.begin().await?;
    if !request_repo::mark_reviewed(&mut tx, request_id, "rejected", reviewed_by).await? {
        return Err(EngineError::RequestNotPending);
    }
    tx.commit().await?;

    tracing::info!(request_id = %request_id, reviewed_by = %reviewed_by, "Wallet request rejected");

    request_repo::get_request(pool, request_id)
        .await?
        .ok_or(EngineError::RequestNotFound)
}

/// Direct operator adjustment of a wallet: positive credits, negative
/// debits. Used for corrective actions outside the request workflow.
pub async fn manual_adjust(
    pool: &PgPool,
    account_id: Uuid,
    amount: i64,
    performed_by: Uuid,
) -> Result<Transaction, EngineError> {
    if amount == 0 {
        return Err(EngineError::NonPositiveAmount);
    }

    account_repo::get_account(pool, account_id)
        .await?
        .ok_or(EngineError::AccountNotFound)?;

    let mut tx = pool.begin().await?;
    let entry = if amount > 0 {
        ledger::credit(&mut tx, account_id, amount, performed_by, TxnContext::Manual).await?
    } else {
        ledger::debit(&mut tx, account_id, -amount, performed_by, TxnContext::Manual).await?
    };
    tx.commit().await?;

    tracing::info!(
        account_id = %account_id,
        amount = amount,
        performed_by = %performed_by,
        "Manual wallet adjustment"
    );

    Ok(entry)
}
