//! Result declaration and bet settlement.
//!
//! Declaring the open-phase result of a two-phase market side-settles the
//! open-phase bets without advancing the event. Declaring the final
//! result moves the event to `resulted`, scores every remaining pending
//! bet, and rolls recurring events into their next cycle.
//!
//! Each bet settles in its own database transaction guarded on
//! `result = 'pending'`, which makes the whole pass idempotent and safe
//! to resume after a partial failure.

use metrics::counter;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{bet_repo, event_repo};
use crate::engine::evaluator::{self, Evaluation, MarketPhase, OutcomeSide, Prediction};
use crate::engine::lifecycle::{self, LifecycleAction};
use crate::engine::recurrence::{self, NextCycle};
use crate::engine::{event_family, event_status, EngineError};
use crate::ledger::{self, TxnContext};
use crate::models::{Bet, Event, EventStatus, GameFamily, RecurrencePattern};

/// Which declaration triggered a settlement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementPhase {
    Open,
    Final,
}

/// Outcome of one settlement pass over an event's pending bets.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SettlementSummary {
    pub settled: u64,
    pub winners: u64,
    pub total_payout: i64,
    /// Bets that were claimed by an earlier pass (idempotent re-run).
    pub skipped: u64,
}

/// Declare the open-phase result of a two-phase market.
///
/// The event must be `closed`; its status does not change. Pending bets
/// targeting the open phase are settled against the declared pair.
pub async fn declare_open_result(
    pool: &PgPool,
    event_id: Uuid,
    declared: &str,
    declared_by: Uuid,
) -> Result<SettlementSummary, EngineError> {
    let event = event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)?;

    if !event_family(&event)?.is_two_phase() {
        return Err(EngineError::OpenResultNotSupported);
    }
    lifecycle::transition(event_status(&event)?, LifecycleAction::DeclareOpenResult)?;
    if event.open_result.is_some() {
        return Err(EngineError::ResultAlreadyDeclared);
    }
    if !evaluator::is_two_digit_pair(declared) {
        return Err(EngineError::MalformedResult(declared.to_string()));
    }

    if !event_repo::set_open_result(pool, event_id, declared).await? {
        return Err(EngineError::ResultAlreadyDeclared);
    }

    let summary = settle_pending(pool, &event, SettlementPhase::Open, declared, declared_by).await?;

    tracing::info!(
        event_id = %event_id,
        result = declared,
        settled = summary.settled,
        winners = summary.winners,
        "Open result declared"
    );

    Ok(summary)
}

/// Declare the final result and settle every remaining pending bet.
///
/// For two-phase markets the open result must already be on the board.
/// Recurring events are rolled into their next cycle afterwards; a
/// reschedule failure never undoes the settlement that preceded it.
pub async fn declare_close_result(
    pool: &PgPool,
    event_id: Uuid,
    declared: &str,
    declared_by: Uuid,
) -> Result<SettlementSummary, EngineError> {
    let event = event_repo::get_event(pool, event_id)
        .await?
        .ok_or(EngineError::EventNotFound)?;

    let family = event_family(&event)?;
    lifecycle::transition(event_status(&event)?, LifecycleAction::DeclareCloseResult)?;
    if event.close_result.is_some() {
        return Err(EngineError::ResultAlreadyDeclared);
    }
    if family.is_two_phase() && event.open_result.is_none() {
        return Err(EngineError::OpenResultMissing);
    }
    validate_final_result(family, declared, event.odds_draw.is_some())?;

    if !event_repo::set_close_result(pool, event_id, declared).await? {
        return Err(EngineError::ResultAlreadyDeclared);
    }

    let summary =
        settle_pending(pool, &event, SettlementPhase::Final, declared, declared_by).await?;

    tracing::info!(
        event_id = %event_id,
        result = declared,
        settled = summary.settled,
        winners = summary.winners,
        total_payout = summary.total_payout,
        "Final result declared, event resulted"
    );

    if event.is_recurring {
        match reschedule(pool, &event).await {
            Ok(next) => {
                tracing::info!(
                    event_id = %event_id,
                    next_open = %next.open_time,
                    next_close = %next.close_time,
                    "Recurring event rolled over"
                );
            }
            Err(e) => {
                // Settlement stands; only the rollover is lost.
                tracing::warn!(
                    error = %e,
                    event_id = %event_id,
                    "Failed to reschedule recurring event"
                );
            }
        }
    }

    Ok(summary)
}

fn validate_final_result(
    family: GameFamily,
    declared: &str,
    draw_offered: bool,
) -> Result<(), EngineError> {
    let valid = match family {
        GameFamily::Numeric => evaluator::is_two_digit_pair(declared),
        GameFamily::TeamMatch => matches!(
            OutcomeSide::parse(declared),
            Some(OutcomeSide::TeamA | OutcomeSide::TeamB)
        ) || (draw_offered && OutcomeSide::parse(declared) == Some(OutcomeSide::Draw)),
        GameFamily::Toss => matches!(
            OutcomeSide::parse(declared),
            Some(OutcomeSide::TeamA | OutcomeSide::TeamB)
        ),
    };

    if valid {
        Ok(())
    } else {
        Err(EngineError::MalformedResult(declared.to_string()))
    }
}

async fn settle_pending(
    pool: &PgPool,
    event: &Event,
    phase: SettlementPhase,
    declared: &str,
    performed_by: Uuid,
) -> Result<SettlementSummary, EngineError> {
    let pending = bet_repo::get_pending_for_event(pool, event.id).await?;
    let mut summary = SettlementSummary::default();

    for bet in &pending {
        let parsed = Prediction::from_stored(&bet.prediction);

        if phase == SettlementPhase::Open
            && !matches!(&parsed, Ok(p) if p.phase() == Some(MarketPhase::Open))
        {
            // Close-phase bets wait for the final declaration.
            continue;
        }

        // Which declared string this bet scores against: open-phase bets
        // always score against the open result, everything else against
        // the result being declared now.
        let target: Option<&str> = match &parsed {
            Ok(p) if p.phase() == Some(MarketPhase::Open) => match phase {
                SettlementPhase::Open => Some(declared),
                SettlementPhase::Final => event.open_result.as_deref(),
            },
            Ok(_) => Some(declared),
            Err(_) => None,
        };

        let evaluation = match (&parsed, target) {
            (Ok(p), Some(target)) => match evaluator::odds_for(p, event) {
                Some(odds) => evaluator::evaluate(p, target, odds, bet.stake),
                None => Evaluation::LOST,
            },
            // Unclassifiable predictions settle as a loss so the pass
            // always terminates.
            _ => Evaluation::LOST,
        };

        match settle_bet(pool, bet, target.unwrap_or(declared), evaluation, performed_by).await {
            Ok(true) => {
                summary.settled += 1;
                if evaluation.won {
                    summary.winners += 1;
                    summary.total_payout += evaluation.payout;
                }
            }
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                // Leave the bet pending; the next pass picks it up.
                tracing::error!(error = %e, bet_id = %bet.id, "Failed to settle bet");
            }
        }
    }

    counter!("bets_settled_total").increment(summary.settled);
    counter!("bets_won_total").increment(summary.winners);
    if summary.total_payout > 0 {
        counter!("settlement_payout_units_total").increment(summary.total_payout as u64);
    }

    Ok(summary)
}

/// Settle a single bet in its own transaction.
///
/// Returns false when another pass already claimed the bet.
async fn settle_bet(
    pool: &PgPool,
    bet: &Bet,
    recorded: &str,
    evaluation: Evaluation,
    performed_by: Uuid,
) -> Result<bool, EngineError> {
    let mut tx = pool.begin().await?;

    if !bet_repo::mark_settled(&mut tx, bet.id, recorded, evaluation.payout).await? {
        tx.rollback().await?;
        return Ok(false);
    }

    if evaluation.won && evaluation.payout > 0 {
        let entry = ledger::credit(
            &mut tx,
            bet.account_id,
            evaluation.payout,
            performed_by,
            TxnContext::Bet(bet.id),
        )
        .await?;
        bet_repo::set_balance_after(&mut tx, bet.id, entry.balance_after).await?;
    }

    tx.commit().await?;

    tracing::debug!(
        bet_id = %bet.id,
        won = evaluation.won,
        payout = evaluation.payout,
        "Bet settled"
    );

    Ok(true)
}

async fn reschedule(pool: &PgPool, event: &Event) -> Result<NextCycle, EngineError> {
    let pattern = event
        .recurrence_pattern
        .as_deref()
        .map(RecurrencePattern::from_db_str)
        .unwrap_or(RecurrencePattern::Custom);

    let next = recurrence::next_cycle(event.open_time, event.close_time, pattern)?;

    lifecycle::transition(EventStatus::Resulted, LifecycleAction::Reschedule)?;
    if !event_repo::apply_next_cycle(pool, event.id, next.open_time, next.close_time).await? {
        return Err(EngineError::ConcurrentUpdate);
    }

    Ok(next)
}
