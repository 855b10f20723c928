//! Standalone coin-flip game.
//!
//! There is no event row and no pending state: the stake debit, the flip,
//! the payout credit, and the settled bet row all commit in one database
//! transaction.

use metrics::counter;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{account_repo, bet_repo};
use crate::engine::evaluator::{self, OutcomeSide, Prediction, PredictionError};
use crate::engine::EngineError;
use crate::ledger::{self, TxnContext};
use crate::models::Bet;

/// A coin-flip play as it arrives from the API.
#[derive(Debug, Clone)]
pub struct CoinflipPlay {
    pub account_id: Uuid,
    pub stake: i64,
    /// `heads` or `tails`.
    pub call: String,
}

/// Play one coin flip at the configured odds.
pub async fn play(pool: &PgPool, play: CoinflipPlay, odds: i32) -> Result<Bet, EngineError> {
    if play.stake <= 0 {
        return Err(EngineError::NonPositiveStake);
    }
    if odds <= 0 {
        return Err(EngineError::InvalidOdds);
    }

    let account = account_repo::get_account(pool, play.account_id)
        .await?
        .ok_or(EngineError::AccountNotFound)?;
    if account.is_blocked {
        return Err(EngineError::AccountBlocked);
    }

    let call = OutcomeSide::parse_coin(&play.call).ok_or_else(|| {
        EngineError::Prediction(PredictionError::Malformed {
            mode: "coinflip".to_string(),
            selection: play.call.clone(),
        })
    })?;

    let landed = if rand::random::<bool>() {
        OutcomeSide::Heads
    } else {
        OutcomeSide::Tails
    };

    let prediction = Prediction::Outcome(call);
    let evaluation = evaluator::evaluate(&prediction, landed.as_str(), odds, play.stake);

    let bet_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;
    let debit_entry = ledger::debit(
        &mut tx,
        play.account_id,
        play.stake,
        play.account_id,
        TxnContext::Bet(bet_id),
    )
    .await?;
    bet_repo::insert_bet(
        &mut tx,
        bet_id,
        play.account_id,
        None,
        play.stake,
        &prediction.to_stored(),
        debit_entry.balance_after,
    )
    .await?;
    // Flip is already decided; record the outcome on the same row.
    bet_repo::mark_settled(&mut tx, bet_id, landed.as_str(), evaluation.payout).await?;
    if evaluation.won && evaluation.payout > 0 {
        let credit_entry = ledger::credit(
            &mut tx,
            play.account_id,
            evaluation.payout,
            play.account_id,
            TxnContext::Bet(bet_id),
        )
        .await?;
        bet_repo::set_balance_after(&mut tx, bet_id, credit_entry.balance_after).await?;
    }
    tx.commit().await?;

    counter!("coinflips_played_total").increment(1);
    tracing::info!(
        bet_id = %bet_id,
        account_id = %play.account_id,
        stake = play.stake,
        call = %call,
        landed = %landed,
        won = evaluation.won,
        "Coin flip played"
    );

    bet_repo::get_bet(pool, bet_id)
        .await?
        .ok_or_else(|| EngineError::CorruptRow("coin flip bet vanished".to_string()))
}
