use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::models::WalletRequest;

/// File a new deposit/withdrawal request for operator review.
pub async fn insert_request(
    pool: &PgPool,
    account_id: Uuid,
    kind: &str,
    amount: i64,
) -> anyhow::Result<WalletRequest> {
    let request = sqlx::query_as::<_, WalletRequest>(
        r#"
        INSERT INTO wallet_requests (account_id, kind, amount)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(kind)
    .bind(amount)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

/// Get a single request by id.
pub async fn get_request(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<WalletRequest>> {
    let request = sqlx::query_as::<_, WalletRequest>(
        "SELECT * FROM wallet_requests WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

/// Requests awaiting review, oldest first.
pub async fn get_pending_requests(pool: &PgPool) -> anyhow::Result<Vec<WalletRequest>> {
    let requests = sqlx::query_as::<_, WalletRequest>(
        "SELECT * FROM wallet_requests WHERE status = 'pending' ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// Claim a pending request as approved/rejected inside the review
/// transaction. Returns false when the request was already reviewed.
pub async fn mark_reviewed(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    id: Uuid,
    status: &str,
    reviewed_by: Uuid,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        r#"
        UPDATE wallet_requests
        SET status = $2, reviewed_by = $3, reviewed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(reviewed_by)
    .execute(&mut **tx)
    .await?;

    Ok(updated.rows_affected() > 0)
}
