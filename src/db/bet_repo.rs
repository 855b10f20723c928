use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::models::Bet;

/// Insert a bet inside the placement transaction, right after the stake
/// debit. The id is generated by the caller so the debit's transaction
/// row can reference it.
pub async fn insert_bet(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    id: Uuid,
    account_id: Uuid,
    event_id: Option<Uuid>,
    stake: i64,
    prediction: &str,
    balance_after: i64,
) -> Result<Bet, sqlx::Error> {
    sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (id, account_id, event_id, stake, prediction, balance_after)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(account_id)
    .bind(event_id)
    .bind(stake)
    .bind(prediction)
    .bind(balance_after)
    .fetch_one(&mut **tx)
    .await
}

/// Get a single bet by id.
pub async fn get_bet(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Bet>> {
    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bet)
}

/// All still-pending bets on an event, oldest first.
pub async fn get_pending_for_event(pool: &PgPool, event_id: Uuid) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE event_id = $1 AND result = 'pending' ORDER BY created_at ASC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Claim a pending bet for settlement, writing its outcome and payout.
///
/// The `result = 'pending'` guard is what makes settlement idempotent: a
/// bet can be claimed exactly once, re-runs return false and skip it.
pub async fn mark_settled(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    id: Uuid,
    result: &str,
    payout: i64,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE bets SET result = $2, payout = $3 WHERE id = $1 AND result = 'pending'",
    )
    .bind(id)
    .bind(result)
    .bind(payout)
    .execute(&mut **tx)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Refresh the balance snapshot after a settlement credit.
pub async fn set_balance_after(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    id: Uuid,
    balance_after: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bets SET balance_after = $2 WHERE id = $1")
        .bind(id)
        .bind(balance_after)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Bet history for an account, newest first.
pub async fn get_bets_by_account(pool: &PgPool, account_id: Uuid) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE account_id = $1 ORDER BY created_at DESC",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}
