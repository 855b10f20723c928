mod common;

use wagerdesk::db::{account_repo, bet_repo, transaction_repo};
use wagerdesk::engine::events;
use wagerdesk::engine::placement::{place_bet, PlaceBet};
use wagerdesk::engine::EngineError;

fn exact_pair_order(
    account_id: uuid::Uuid,
    event_id: uuid::Uuid,
    stake: i64,
    selection: &str,
) -> PlaceBet {
    PlaceBet {
        account_id,
        event_id,
        stake,
        mode: "exact_pair".into(),
        phase: Some("close".into()),
        selection: selection.into(),
    }
}

#[tokio::test]
async fn test_place_bet_debits_stake_and_records_pending_bet() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.expect("open should succeed");

    let bet = place_bet(&pool, exact_pair_order(account.id, event.id, 100, "42"))
        .await
        .expect("placement should succeed");

    assert!(bet.is_pending());
    assert_eq!(bet.stake, 100);
    assert_eq!(bet.payout, 0);
    assert_eq!(bet.prediction, "close:pair:42");
    assert_eq!(bet.balance_after, 900);

    let account = account_repo::get_account(&pool, account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, 900);

    // Funding credit + stake debit: exactly one row per balance mutation.
    let txns = transaction_repo::get_by_account(&pool, account.id).await.unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[1].amount, -100);
    assert_eq!(txns[1].balance_after, 900);
    assert_eq!(txns[1].bet_id, Some(bet.id));
}

#[tokio::test]
async fn test_bet_on_closed_event_is_rejected_without_debit() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();
    events::close_event(&pool, event.id).await.unwrap();

    let result = place_bet(&pool, exact_pair_order(account.id, event.id, 100, "42")).await;
    assert!(matches!(result, Err(EngineError::EventNotOpen)));

    let account = account_repo::get_account(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(account.balance, 1_000, "rejected bet must not move money");
    assert!(bet_repo::get_bets_by_account(&pool, account.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bet_on_waiting_event_is_rejected() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;

    let result = place_bet(&pool, exact_pair_order(account.id, event.id, 100, "42")).await;
    assert!(matches!(result, Err(EngineError::EventNotOpen)));
}

#[tokio::test]
async fn test_malformed_prediction_is_rejected_before_any_debit() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();

    for (mode, selection) in [
        ("exact_pair", "4"),
        ("exact_pair", "4x2"),
        ("single_digit", "left:x"),
        ("combination", "1,42"),
        ("parity", "evenish"),
        ("jodi", "42"),
    ] {
        let result = place_bet(
            &pool,
            PlaceBet {
                account_id: account.id,
                event_id: event.id,
                stake: 100,
                mode: mode.into(),
                phase: None,
                selection: selection.into(),
            },
        )
        .await;
        assert!(result.is_err(), "{mode}/{selection} should be rejected");
    }

    let account = account_repo::get_account(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(account.balance, 1_000);
}

#[tokio::test]
async fn test_insufficient_balance_is_rejected() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 50).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();

    let result = place_bet(&pool, exact_pair_order(account.id, event.id, 100, "42")).await;
    assert!(matches!(result, Err(EngineError::Ledger(_))));

    let account = account_repo::get_account(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(account.balance, 50);
}

#[tokio::test]
async fn test_non_positive_stake_is_rejected() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();

    for stake in [0, -10] {
        let result = place_bet(&pool, exact_pair_order(account.id, event.id, stake, "42")).await;
        assert!(matches!(result, Err(EngineError::NonPositiveStake)));
    }
}

#[tokio::test]
async fn test_blocked_account_cannot_bet() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();

    account_repo::set_blocked(&pool, account.id, true).await.unwrap();

    let result = place_bet(&pool, exact_pair_order(account.id, event.id, 100, "42")).await;
    assert!(matches!(result, Err(EngineError::AccountBlocked)));
}

#[tokio::test]
async fn test_match_bet_after_start_time_is_rejected() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    // Started an hour ago but the operator never closed it.
    let start = chrono::Utc::now() - chrono::Duration::hours(1);
    let event = common::seed_match_event(&pool, start, 180, 210, Some(300)).await;
    events::open_event(&pool, event.id).await.unwrap();

    let result = place_bet(
        &pool,
        PlaceBet {
            account_id: account.id,
            event_id: event.id,
            stake: 100,
            mode: "outcome".into(),
            phase: None,
            selection: "team_a".into(),
        },
    )
    .await;
    assert!(matches!(result, Err(EngineError::EventStarted)));
}

#[tokio::test]
async fn test_match_bet_before_start_is_accepted() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let start = chrono::Utc::now() + chrono::Duration::hours(2);
    let event = common::seed_match_event(&pool, start, 180, 210, Some(300)).await;
    events::open_event(&pool, event.id).await.unwrap();

    let bet = place_bet(
        &pool,
        PlaceBet {
            account_id: account.id,
            event_id: event.id,
            stake: 250,
            mode: "outcome".into(),
            phase: None,
            selection: "draw".into(),
        },
    )
    .await
    .expect("pre-start match bet should succeed");

    assert_eq!(bet.prediction, "outcome:draw");
    assert_eq!(bet.balance_after, 750);
}

#[tokio::test]
async fn test_draw_bet_rejected_when_no_draw_odds() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let start = chrono::Utc::now() + chrono::Duration::hours(2);
    let event = common::seed_match_event(&pool, start, 180, 210, None).await;
    events::open_event(&pool, event.id).await.unwrap();

    let result = place_bet(
        &pool,
        PlaceBet {
            account_id: account.id,
            event_id: event.id,
            stake: 100,
            mode: "outcome".into(),
            phase: None,
            selection: "draw".into(),
        },
    )
    .await;
    assert!(result.is_err());

    let account = account_repo::get_account(&pool, account.id).await.unwrap().unwrap();
    assert_eq!(account.balance, 1_000);
}
