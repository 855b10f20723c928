use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::bet_repo;
use crate::engine::coinflip::{self, CoinflipPlay};
use crate::engine::placement::{self, PlaceBet};
use crate::errors::AppError;
use crate::models::Bet;
use crate::AppState;

#[derive(Deserialize)]
pub struct PlaceBetPayload {
    pub account_id: Uuid,
    pub event_id: Uuid,
    pub stake: i64,
    pub mode: String,
    pub phase: Option<String>,
    pub selection: String,
}

/// POST /api/bets — place a bet against an open event.
pub async fn place(
    State(state): State<AppState>,
    Json(payload): Json<PlaceBetPayload>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let bet = placement::place_bet(
        &state.db,
        PlaceBet {
            account_id: payload.account_id,
            event_id: payload.event_id,
            stake: payload.stake,
            mode: payload.mode,
            phase: payload.phase,
            selection: payload.selection,
        },
    )
    .await?;

    Ok(Json(ApiResponse::ok(bet)))
}

/// GET /api/accounts/:id/bets — a player's bet history.
pub async fn history(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Json<ApiResponse<Vec<Bet>>> {
    match bet_repo::get_bets_by_account(&state.db, account_id).await {
        Ok(bets) => Json(ApiResponse::ok(bets)),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

#[derive(Deserialize)]
pub struct CoinflipPayload {
    pub account_id: Uuid,
    pub stake: i64,
    pub call: String,
}

/// POST /api/coinflip/play — instant coin-flip game.
pub async fn play_coinflip(
    State(state): State<AppState>,
    Json(payload): Json<CoinflipPayload>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let bet = coinflip::play(
        &state.db,
        CoinflipPlay {
            account_id: payload.account_id,
            stake: payload.stake,
            call: payload.call,
        },
        state.config.coinflip_odds,
    )
    .await?;

    Ok(Json(ApiResponse::ok(bet)))
}
