use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Event;

/// Insert a new event in `waiting_result`.
#[allow(clippy::too_many_arguments)]
pub async fn insert_event(
    pool: &PgPool,
    name: &str,
    family: &str,
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
    odds_a: i32,
    odds_b: i32,
    odds_draw: Option<i32>,
    is_recurring: bool,
    recurrence_pattern: Option<&str>,
) -> anyhow::Result<Event> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (name, family, open_time, close_time, odds_a, odds_b, odds_draw,
                            is_recurring, recurrence_pattern)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(family)
    .bind(open_time)
    .bind(close_time)
    .bind(odds_a)
    .bind(odds_b)
    .bind(odds_draw)
    .bind(is_recurring)
    .bind(recurrence_pattern)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

/// Get a single event by id.
pub async fn get_event(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Event>> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(event)
}

/// List events, newest first, optionally filtered by status.
pub async fn list_events(pool: &PgPool, status: Option<&str>) -> anyhow::Result<Vec<Event>> {
    let events = match status {
        Some(s) => {
            sqlx::query_as::<_, Event>(
                "SELECT * FROM events WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(events)
}

/// Move an event between lifecycle statuses.
///
/// Guarded on the expected current status so a concurrent operator action
/// cannot double-apply a transition. Returns false when the guard misses.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    expected: &str,
    next: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE events SET status = $3 WHERE id = $1 AND status = $2")
        .bind(id)
        .bind(expected)
        .bind(next)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Store the open-phase result. Status is left untouched.
pub async fn set_open_result(pool: &PgPool, id: Uuid, result: &str) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        r#"
        UPDATE events
        SET open_result = $2
        WHERE id = $1 AND status = 'closed' AND open_result IS NULL
        "#,
    )
    .bind(id)
    .bind(result)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Store the final result and move the event to `resulted` in one write.
pub async fn set_close_result(pool: &PgPool, id: Uuid, result: &str) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        r#"
        UPDATE events
        SET close_result = $2, status = 'resulted'
        WHERE id = $1 AND status = 'closed' AND close_result IS NULL
        "#,
    )
    .bind(id)
    .bind(result)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Edit the schedule of an event that has not yet opened for betting.
pub async fn update_schedule(
    pool: &PgPool,
    id: Uuid,
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        r#"
        UPDATE events
        SET open_time = $2, close_time = $3
        WHERE id = $1 AND status = 'waiting_result'
        "#,
    )
    .bind(id)
    .bind(open_time)
    .bind(close_time)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected() > 0)
}

/// Roll a settled recurring event over to its next cycle: new window,
/// cleared result slots, back to `waiting_result`.
pub async fn apply_next_cycle(
    pool: &PgPool,
    id: Uuid,
    next_open: DateTime<Utc>,
    next_close: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        r#"
        UPDATE events
        SET status = 'waiting_result',
            open_time = $2,
            close_time = $3,
            next_open_time = $2,
            next_close_time = $3,
            open_result = NULL,
            close_result = NULL
        WHERE id = $1 AND status = 'resulted'
        "#,
    )
    .bind(id)
    .bind(next_open)
    .bind(next_close)
    .execute(pool)
    .await?;

    Ok(updated.rows_affected() > 0)
}
