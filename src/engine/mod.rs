pub mod coinflip;
pub mod evaluator;
pub mod events;
pub mod lifecycle;
pub mod placement;
pub mod recurrence;
pub mod settlement;
pub mod wallet;

use crate::ledger::LedgerError;
use crate::models::{Event, EventStatus, GameFamily};

/// Engine-level failure taxonomy. Every rejected operation leaves ledger
/// and bet state exactly as before the call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("account not found")]
    AccountNotFound,

    #[error("event not found")]
    EventNotFound,

    #[error("wallet request not found")]
    RequestNotFound,

    #[error("account is blocked")]
    AccountBlocked,

    #[error("stake must be positive")]
    NonPositiveStake,

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("event is not open for betting")]
    EventNotOpen,

    #[error("event has already started")]
    EventStarted,

    #[error("a result has already been declared")]
    ResultAlreadyDeclared,

    #[error("the open result must be declared before the final result")]
    OpenResultMissing,

    #[error("single-result events take only a final result")]
    OpenResultNotSupported,

    #[error("malformed declared result: {0:?}")]
    MalformedResult(String),

    #[error("game family is required")]
    MissingFamily,

    #[error("unknown game family: {0}")]
    UnknownFamily(String),

    #[error("odds must be positive")]
    InvalidOdds,

    #[error("schedule can only be edited while the event is waiting for a result")]
    ScheduleLocked,

    #[error("request has already been reviewed")]
    RequestNotPending,

    #[error("event changed concurrently, retry")]
    ConcurrentUpdate,

    #[error("stored row is corrupt: {0}")]
    CorruptRow(String),

    #[error(transparent)]
    Prediction(#[from] evaluator::PredictionError),

    #[error(transparent)]
    Lifecycle(#[from] lifecycle::LifecycleError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Recurrence(#[from] recurrence::RecurrenceError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub(crate) fn event_status(event: &Event) -> Result<EventStatus, EngineError> {
    EventStatus::from_db_str(&event.status)
        .ok_or_else(|| EngineError::CorruptRow(format!("unknown event status {:?}", event.status)))
}

pub(crate) fn event_family(event: &Event) -> Result<GameFamily, EngineError> {
    GameFamily::from_db_str(&event.family)
        .ok_or_else(|| EngineError::CorruptRow(format!("unknown game family {:?}", event.family)))
}
