//! Event lifecycle state machine.
//!
//! `waiting_result → open → closed → resulted`, with
//! `resulted → waiting_result` as the rollover into a recurring event's
//! next cycle. Every transition is operator-triggered; nothing moves on a
//! timer, and an event past its scheduled close time stays `open` until an
//! operator closes it.

use crate::models::EventStatus;

/// Operator action applied to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Open a fresh cycle for betting.
    Open,
    /// Operator override: put a closed/resulted event back on the board.
    Reopen,
    /// Stop accepting bets.
    Close,
    /// Declare the open-phase result (two-phase events; no status change).
    DeclareOpenResult,
    /// Declare the final result.
    DeclareCloseResult,
    /// Roll a settled recurring event into its next cycle.
    Reschedule,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Open => "open",
            LifecycleAction::Reopen => "reopen",
            LifecycleAction::Close => "close",
            LifecycleAction::DeclareOpenResult => "declare the open result for",
            LifecycleAction::DeclareCloseResult => "declare the result for",
            LifecycleAction::Reschedule => "reschedule",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot {} an event in status {status}", .action.as_str())]
    InvalidTransition {
        status: EventStatus,
        action: LifecycleAction,
    },
}

/// Status an event moves to when `action` is applied in `status`.
///
/// `DeclareOpenResult` deliberately maps `closed → closed`: the open-phase
/// declaration side-settles open-phase bets without advancing the event.
pub fn transition(
    status: EventStatus,
    action: LifecycleAction,
) -> Result<EventStatus, LifecycleError> {
    match (status, action) {
        (EventStatus::WaitingResult, LifecycleAction::Open) => Ok(EventStatus::Open),
        (EventStatus::Closed | EventStatus::Resulted, LifecycleAction::Reopen) => {
            Ok(EventStatus::Open)
        }
        (EventStatus::Open, LifecycleAction::Close) => Ok(EventStatus::Closed),
        (EventStatus::Closed, LifecycleAction::DeclareOpenResult) => Ok(EventStatus::Closed),
        (EventStatus::Closed, LifecycleAction::DeclareCloseResult) => Ok(EventStatus::Resulted),
        (EventStatus::Resulted, LifecycleAction::Reschedule) => Ok(EventStatus::WaitingResult),
        _ => Err(LifecycleError::InvalidTransition { status, action }),
    }
}
