//! Bet placement: validate, debit, record — in that order, atomically.

use chrono::Utc;
use metrics::counter;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{account_repo, bet_repo, event_repo};
use crate::engine::evaluator::{self, Prediction};
use crate::engine::{event_family, event_status, EngineError};
use crate::ledger::{self, TxnContext};
use crate::models::{Bet, EventStatus};

/// A player's bet order as it arrives from the API.
#[derive(Debug, Clone)]
pub struct PlaceBet {
    pub account_id: Uuid,
    pub event_id: Uuid,
    pub stake: i64,
    /// Bet type: `exact_pair` | `single_digit` | `combination` | `parity`
    /// for numeric markets, `outcome` for matches.
    pub mode: String,
    /// `open` or `close` for numeric markets; defaults to close.
    pub phase: Option<String>,
    pub selection: String,
}

/// Validate and place a bet against an open event.
///
/// All checks run before any money moves; the stake debit and the bet
/// insert then commit as one database transaction.
pub async fn place_bet(pool: &PgPool, order: PlaceBet) -> Result<Bet, EngineError> {
    if order.stake <= 0 {
        return Err(EngineError::NonPositiveStake);
    }

    let account = account_repo::get_account(pool, order.account_id)
        .await?
        .ok_or(EngineError::AccountNotFound)?;
    if account.is_blocked {
        return Err(EngineError::AccountBlocked);
    }

    let event = event_repo::get_event(pool, order.event_id)
        .await?
        .ok_or(EngineError::EventNotFound)?;

    if event_status(&event)? != EventStatus::Open {
        return Err(EngineError::EventNotOpen);
    }

    let family = event_family(&event)?;
    if family.is_time_bound() {
        // For matches the close time is the scheduled start.
        if let Some(start) = event.close_time {
            if Utc::now() >= start {
                return Err(EngineError::EventStarted);
            }
        }
    }

    let prediction = Prediction::parse(
        family,
        &order.mode,
        order.phase.as_deref(),
        &order.selection,
        event.odds_draw.is_some(),
    )?;

    // The predicted side must have odds on the board before we take money.
    if evaluator::odds_for(&prediction, &event).is_none() {
        return Err(EngineError::InvalidOdds);
    }

    let bet_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;
    let entry = ledger::debit(
        &mut tx,
        order.account_id,
        order.stake,
        order.account_id,
        TxnContext::Bet(bet_id),
    )
    .await?;
    let bet = bet_repo::insert_bet(
        &mut tx,
        bet_id,
        order.account_id,
        Some(order.event_id),
        order.stake,
        &prediction.to_stored(),
        entry.balance_after,
    )
    .await?;
    tx.commit().await?;

    counter!("bets_placed_total").increment(1);
    tracing::info!(
        bet_id = %bet.id,
        account_id = %order.account_id,
        event_id = %order.event_id,
        stake = order.stake,
        prediction = %bet.prediction,
        "Bet placed"
    );

    Ok(bet)
}
