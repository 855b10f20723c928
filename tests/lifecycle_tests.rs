mod common;

use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};

use wagerdesk::db::event_repo;
use wagerdesk::engine::events::{self, NewEvent};
use wagerdesk::engine::placement::{place_bet, PlaceBet};
use wagerdesk::engine::settlement::{declare_close_result, declare_open_result};
use wagerdesk::engine::EngineError;

#[tokio::test]
async fn test_full_lifecycle_walk() {
    let pool = common::setup_test_db().await;
    let operator = common::seed_operator(&pool).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    assert_eq!(event.status, "waiting_result");

    let event = events::open_event(&pool, event.id).await.unwrap();
    assert_eq!(event.status, "open");

    let event = events::close_event(&pool, event.id).await.unwrap();
    assert_eq!(event.status, "closed");

    declare_open_result(&pool, event.id, "15", operator.id).await.unwrap();
    let event = event_repo::get_event(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(event.status, "closed", "open result must not advance status");

    declare_close_result(&pool, event.id, "90", operator.id).await.unwrap();
    let event = event_repo::get_event(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(event.status, "resulted");
    assert_eq!(event.open_result.as_deref(), Some("15"));
    assert_eq!(event.close_result.as_deref(), Some("90"));
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected() {
    let pool = common::setup_test_db().await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;

    // Cannot close or reopen before ever opening.
    assert!(events::close_event(&pool, event.id).await.is_err());
    assert!(events::reopen_event(&pool, event.id).await.is_err());

    events::open_event(&pool, event.id).await.unwrap();
    // Cannot open twice.
    assert!(matches!(
        events::open_event(&pool, event.id).await,
        Err(EngineError::Lifecycle(_))
    ));
}

#[tokio::test]
async fn test_reopen_puts_closed_event_back_on_the_board() {
    let pool = common::setup_test_db().await;
    let account = common::seed_account(&pool, 1_000).await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;
    events::open_event(&pool, event.id).await.unwrap();
    events::close_event(&pool, event.id).await.unwrap();

    let event = events::reopen_event(&pool, event.id).await.unwrap();
    assert_eq!(event.status, "open");

    // Betting works again after the explicit override.
    place_bet(
        &pool,
        PlaceBet {
            account_id: account.id,
            event_id: event.id,
            stake: 100,
            mode: "exact_pair".into(),
            phase: None,
            selection: "42".into(),
        },
    )
    .await
    .expect("bet after reopen should succeed");
}

#[tokio::test]
async fn test_schedule_editable_only_while_waiting() {
    let pool = common::setup_test_db().await;
    let event = common::seed_numeric_event(&pool, 900, 900).await;

    let new_open = Utc::now() + Duration::hours(3);
    let new_close = Utc::now() + Duration::hours(12);
    let event = events::edit_schedule(&pool, event.id, Some(new_open), Some(new_close))
        .await
        .unwrap();
    assert_eq!(event.open_time.unwrap().timestamp(), new_open.timestamp());

    events::open_event(&pool, event.id).await.unwrap();
    let result = events::edit_schedule(&pool, event.id, Some(new_open), Some(new_close)).await;
    assert!(matches!(result, Err(EngineError::ScheduleLocked)));
}

#[tokio::test]
async fn test_create_event_cloned_from_template() {
    let pool = common::setup_test_db().await;
    let template = common::seed_numeric_event(&pool, 950, 875).await;

    let clone = events::create_event(
        &pool,
        NewEvent {
            name: "next cycle".into(),
            clone_from: Some(template.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(clone.family, template.family);
    assert_eq!(clone.odds_a, 950);
    assert_eq!(clone.odds_b, 875);
    assert_eq!(clone.status, "waiting_result");
    assert!(clone.open_result.is_none());
    assert_ne!(clone.id, template.id);
}

#[tokio::test]
async fn test_create_event_validation() {
    let pool = common::setup_test_db().await;

    let missing_family = events::create_event(
        &pool,
        NewEvent { name: "x".into(), ..Default::default() },
    )
    .await;
    assert!(matches!(missing_family, Err(EngineError::MissingFamily)));

    let bad_family = events::create_event(
        &pool,
        NewEvent {
            name: "x".into(),
            family: Some("roulette".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_family, Err(EngineError::UnknownFamily(_))));

    let bad_odds = events::create_event(
        &pool,
        NewEvent {
            name: "x".into(),
            family: Some("numeric".into()),
            odds_a: Some(0),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_odds, Err(EngineError::InvalidOdds)));
}

#[tokio::test]
async fn test_daily_recurrence_rolls_over_after_settlement() {
    let pool = common::setup_test_db().await;
    let operator = common::seed_operator(&pool).await;

    // Thursday window.
    let open = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
    let close = Utc.with_ymd_and_hms(2026, 8, 6, 18, 0, 0).unwrap();
    let event = common::seed_recurring_event(&pool, "daily", open, close).await;

    events::open_event(&pool, event.id).await.unwrap();
    events::close_event(&pool, event.id).await.unwrap();
    declare_open_result(&pool, event.id, "12", operator.id).await.unwrap();
    declare_close_result(&pool, event.id, "34", operator.id).await.unwrap();

    let event = event_repo::get_event(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(event.status, "waiting_result", "new cycle awaits an explicit open");
    assert!(event.open_result.is_none(), "result slots are cleared");
    assert!(event.close_result.is_none());
    assert_eq!(event.open_time.unwrap(), open + Duration::days(1));
    assert_eq!(event.close_time.unwrap(), close + Duration::days(1));
    assert_eq!(event.next_open_time.unwrap(), open + Duration::days(1));
    assert_eq!(event.next_close_time.unwrap(), close + Duration::days(1));
}

#[tokio::test]
async fn test_weekday_recurrence_skips_to_monday() {
    let pool = common::setup_test_db().await;
    let operator = common::seed_operator(&pool).await;

    // Friday window: the next weekday cycle lands on Monday.
    let open = Utc.with_ymd_and_hms(2026, 8, 7, 10, 0, 0).unwrap();
    let close = Utc.with_ymd_and_hms(2026, 8, 7, 18, 0, 0).unwrap();
    let event = common::seed_recurring_event(&pool, "weekdays", open, close).await;

    events::open_event(&pool, event.id).await.unwrap();
    events::close_event(&pool, event.id).await.unwrap();
    declare_open_result(&pool, event.id, "12", operator.id).await.unwrap();
    declare_close_result(&pool, event.id, "34", operator.id).await.unwrap();

    let event = event_repo::get_event(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(event.open_time.unwrap().weekday(), Weekday::Mon);
    assert_eq!(event.open_time.unwrap(), open + Duration::days(3));
}

#[tokio::test]
async fn test_recurrence_failure_never_blocks_settlement() {
    let pool = common::setup_test_db().await;
    let operator = common::seed_operator(&pool).await;
    let account = common::seed_account(&pool, 1_000).await;

    // Recurring event whose window was never scheduled: the rollover
    // cannot be computed, but settlement must still pay out.
    let event = event_repo::insert_event(
        &pool,
        "unscheduled recurring",
        "numeric",
        None,
        None,
        900,
        900,
        None,
        true,
        Some("daily"),
    )
    .await
    .unwrap();

    events::open_event(&pool, event.id).await.unwrap();
    place_bet(
        &pool,
        PlaceBet {
            account_id: account.id,
            event_id: event.id,
            stake: 100,
            mode: "exact_pair".into(),
            phase: None,
            selection: "42".into(),
        },
    )
    .await
    .unwrap();
    events::close_event(&pool, event.id).await.unwrap();
    declare_open_result(&pool, event.id, "11", operator.id).await.unwrap();
    let summary = declare_close_result(&pool, event.id, "42", operator.id).await.unwrap();

    assert_eq!(summary.winners, 1);
    let account = wagerdesk::db::account_repo::get_account(&pool, account.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, 1_800);

    // The event stays resulted; no broken half-cycle was written.
    let event = event_repo::get_event(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(event.status, "resulted");
    assert!(event.next_open_time.is_none());
}
