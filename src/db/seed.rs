use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::db::{account_repo, event_repo};
use crate::ledger::{self, TxnContext};

/// Seed an admin, a funded demo player, and a recurring demo market.
///
/// Invoked once from the process entry point when `SEED_DEMO_DATA` is
/// set; a second run is a no-op. The opening balance goes through the
/// ledger so the demo data satisfies the same audit invariants as real
/// traffic.
pub async fn seed_demo_data(pool: &PgPool) -> anyhow::Result<()> {
    if account_repo::get_by_username(pool, "admin").await?.is_some() {
        tracing::info!("Seed: demo data already present, skipping");
        return Ok(());
    }

    let admin = account_repo::insert_account(pool, "admin", "admin", None).await?;
    let player = account_repo::insert_account(pool, "demo_player", "player", Some(admin.id)).await?;

    let mut tx = pool.begin().await?;
    ledger::credit(&mut tx, player.id, 100_000, admin.id, TxnContext::Manual).await?;
    tx.commit().await?;

    let now = Utc::now();
    let market = event_repo::insert_event(
        pool,
        "demo daily market",
        "numeric",
        Some(now + Duration::hours(1)),
        Some(now + Duration::hours(9)),
        900,
        900,
        None,
        true,
        Some("daily"),
    )
    .await?;

    tracing::info!(
        admin_id = %admin.id,
        player_id = %player.id,
        event_id = %market.id,
        "Seed: demo data created"
    );

    Ok(())
}
