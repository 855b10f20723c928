use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Transaction;

/// Full transaction history for an account in application order.
pub async fn get_by_account(pool: &PgPool, account_id: Uuid) -> anyhow::Result<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE account_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Sum of all transaction amounts for an account. Always equals the
/// account's stored balance; used by audits and tests.
pub async fn sum_for_account(pool: &PgPool, account_id: Uuid) -> anyhow::Result<i64> {
    let row: (Option<i64>,) = sqlx::query_as(
        "SELECT SUM(amount)::BIGINT FROM transactions WHERE account_id = $1",
    )
    .bind(account_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0.unwrap_or(0))
}
