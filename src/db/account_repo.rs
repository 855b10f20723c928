use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Account;

/// Create an account with a zero balance. Opening balances are applied
/// afterwards through the ledger so the audit trail stays complete.
pub async fn insert_account(
    pool: &PgPool,
    username: &str,
    role: &str,
    assigned_to: Option<Uuid>,
) -> anyhow::Result<Account> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (username, role, assigned_to)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(role)
    .bind(assigned_to)
    .fetch_one(pool)
    .await?;

    Ok(account)
}

/// Get a single account by id.
pub async fn get_account(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(account)
}

/// Get a single account by username.
pub async fn get_by_username(pool: &PgPool, username: &str) -> anyhow::Result<Option<Account>> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(account)
}

/// Block or unblock an account. Returns false if the account is unknown.
pub async fn set_blocked(pool: &PgPool, id: Uuid, blocked: bool) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE accounts SET is_blocked = $2 WHERE id = $1")
        .bind(id)
        .bind(blocked)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Accounts assigned to a parent operator.
pub async fn get_assigned_accounts(pool: &PgPool, parent: Uuid) -> anyhow::Result<Vec<Account>> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts WHERE assigned_to = $1 ORDER BY created_at DESC",
    )
    .bind(parent)
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}
