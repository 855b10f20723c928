use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::event_repo;
use crate::engine::events::{self, NewEvent};
use crate::engine::settlement::{self, SettlementSummary};
use crate::errors::AppError;
use crate::models::Event;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateEventPayload {
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

/// POST /api/events — create an event, optionally from a template.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = events::create_event(
        &state.db,
        NewEvent {
            name: payload.name,
            family: payload.family,
            open_time: payload.open_time,
            close_time: payload.close_time,
            odds_a: payload.odds_a,
            odds_b: payload.odds_b,
            odds_draw: payload.odds_draw,
            is_recurring: payload.is_recurring,
            recurrence_pattern: payload.recurrence_pattern,
            clone_from: payload.clone_from,
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(event)))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /api/events?status= — list events.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<ApiResponse<Vec<Event>>> {
    match event_repo::list_events(&state.db, query.status.as_deref()).await {
        Ok(events) => Json(ApiResponse::ok(events)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

/// GET /api/events/:id — event detail.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = event_repo::get_event(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("event not found".into()))?;

    Ok(Json(ApiResponse::ok(event)))
}

#[derive(Deserialize)]
pub struct SchedulePayload {
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
}

/// PUT /api/events/:id/schedule — edit the window while waiting_result.
pub async fn schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SchedulePayload>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event =
        events::edit_schedule(&state.db, id, payload.open_time, payload.close_time).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// POST /api/events/:id/open — open for betting.
pub async fn open(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = events::open_event(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// POST /api/events/:id/close — stop accepting bets.
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = events::close_event(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// POST /api/events/:id/reopen — operator override back onto the board.
pub async fn reopen(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = events::reopen_event(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

#[derive(Deserialize)]
pub struct ResultPayload {
    pub result: String,
    /// Operator account recorded as the settlement actor.
    pub declared_by: Uuid,
}

/// POST /api/events/:id/result/open — declare the open-phase result.
pub async fn declare_open_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResultPayload>,
) -> Result<Json<ApiResponse<SettlementSummary>>, AppError> {
    let summary =
        settlement::declare_open_result(&state.db, id, &payload.result, payload.declared_by)
            .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/events/:id/result/close — declare the final result.
pub async fn declare_close_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResultPayload>,
) -> Result<Json<ApiResponse<SettlementSummary>>, AppError> {
    let summary =
        settlement::declare_close_result(&state.db, id, &payload.result, payload.declared_by)
            .await?;
    Ok(Json(ApiResponse::ok(summary)))
}
