//! Operator-facing event management: creation (optionally from a
//! template), schedule edits, and the open/close/reopen transitions.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::event_repo;
use crate::engine::lifecycle::{self, LifecycleAction};
use crate::engine::{event_status, EngineError};
use crate::models::{Event, GameFamily};

/// Parameters for a new event. With `clone_from` set, any field left
/// unset is carried over from the template event.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub name: String,
    pub family: Option<String>,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub odds_a: Option<i32>,
    pub odds_b: Option<i32>,
    pub odds_draw: Option<i32>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
    pub clone_from: Option<Uuid>,
}

/// Create an event in `waiting_result`.
pub async fn create_event(pool: &PgPool, params: NewEvent) -> Result<Event, EngineError> {
    let template = match params.clone_from {
        Some(id) => Some(
            event_repo::get_event(pool, id)
                .await?
                .ok_or(EngineError::EventNotFound)?,
        ),
        None => None,
    };

    let family = params
        .family
        .or_else(|| template.as_ref().map(|t| t.family.clone()))
        .ok_or(EngineError::MissingFamily)?;
    if GameFamily::from_db_str(&family).is_none() {
        return Err(EngineError::UnknownFamily(family));
    }

    let open_time = params.open_time.or_else(|| template.as_ref().and_then(|t| t.open_time));
    let close_time = params.close_time.or_else(|| template.as_ref().and_then(|t| t.close_time));
    let odds_a = params.odds_a.or_else(|| template.as_ref().map(|t| t.odds_a)).unwrap_or(100);
    let odds_b = params.odds_b.or_else(|| template.as_ref().map(|t| t.odds_b)).unwrap_or(100);
    let odds_draw = params.odds_draw.or_else(|| template.as_ref().and_then(|t| t.odds_draw));
    let is_recurring = params
        .is_recurring
        .or_else(|| template.as_ref().map(|t| t.is_recurring))
        .unwrap_or(false);
    let recurrence_pattern = params
        .recurrence_pattern
        .or_else(|| template.as_ref().and_then(|t| t.recurrence_pattern.clone()));

    if odds_a <= 0 || odds_b <= 0 || odds_draw.is_some_and(|o| o <= 0) {
        return Err(EngineError::InvalidOdds);
    }

    let event = event_repo::insert_event(
        pool,
        &params.name,
        &family,
        open_time,
        close_time,
        odds_a,
        odds_b,
        odds_draw,
        is_recurring,
        recurrence_pattern.as_deref(),
    )
    .await?;

    tracing::info!(
        event_id = %event.id,
        family = %event.family,
        cloned = template.is_some(),
        "Event created"
    );

    Ok(event)
}

/// Edit the betting window of an event still in `waiting_result`.
pub async fn edit_schedule(
    pool: &PgPool,
    event_id: Uuid,
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
) -> Result<Event, EngineError> {
    event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)?;

    if !event_repo::update_schedule(pool, event_id, open_time, close_time).await? {
        return Err(EngineError::ScheduleLocked);
    }

    event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)
}

/// Open a fresh cycle for betting.
pub async fn open_event(pool: &PgPool, event_id: Uuid) -> Result<Event, EngineError> {
    apply_transition(pool, event_id, LifecycleAction::Open).await
}

/// Stop accepting bets.
pub async fn close_event(pool: &PgPool, event_id: Uuid) -> Result<Event, EngineError> {
    apply_transition(pool, event_id, LifecycleAction::Close).await
}

/// Explicit operator override putting a closed/resulted event back on the
/// board. This is the only path that re-opens without cycling.
pub async fn reopen_event(pool: &PgPool, event_id: Uuid) -> Result<Event, EngineError> {
    apply_transition(pool, event_id, LifecycleAction::Reopen).await
}

async fn apply_transition(
    pool: &PgPool,
    event_id: Uuid,
    action: LifecycleAction,
) -> Result<Event, EngineError> {
    let event = event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)?;

    let status = event_status(&event)?;
    let next = lifecycle::transition(status, action)?;

    if !event_repo::update_status(pool, event_id, status.as_str(), next.as_str()).await? {
        return Err(EngineError::ConcurrentUpdate);
    }

    tracing::info!(
        event_id = %event_id,
        from = %status,
        to = %next,
        "Event transitioned"
    );

    event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)
}
