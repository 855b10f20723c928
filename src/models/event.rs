use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EventStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a bettable event.
///
/// Transitions are operator-triggered only; see `engine::lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    WaitingResult,
    Open,
    Closed,
    Resulted,
}

impl EventStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "waiting_result" => Some(EventStatus::WaitingResult),
            "open" => Some(EventStatus::Open),
            "closed" => Some(EventStatus::Closed),
            "resulted" => Some(EventStatus::Resulted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::WaitingResult => "waiting_result",
            EventStatus::Open => "open",
            EventStatus::Closed => "closed",
            EventStatus::Resulted => "resulted",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GameFamily
// ---------------------------------------------------------------------------

/// Game family of an event.
///
/// `Numeric` events are two-phase digit markets with separate open/close
/// results. `TeamMatch` and `Toss` resolve with a single outcome token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameFamily {
    Numeric,
    TeamMatch,
    Toss,
}

impl GameFamily {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "numeric" => Some(GameFamily::Numeric),
            "team_match" => Some(GameFamily::TeamMatch),
            "toss" => Some(GameFamily::Toss),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameFamily::Numeric => "numeric",
            GameFamily::TeamMatch => "team_match",
            GameFamily::Toss => "toss",
        }
    }

    /// Two-phase families carry separate open and close results.
    pub fn is_two_phase(&self) -> bool {
        matches!(self, GameFamily::Numeric)
    }

    /// Time-bound families stop accepting bets once the start time passes.
    pub fn is_time_bound(&self) -> bool {
        matches!(self, GameFamily::TeamMatch | GameFamily::Toss)
    }
}

impl fmt::Display for GameFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RecurrencePattern
// ---------------------------------------------------------------------------

/// How a recurring event's next cycle is computed after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekdays,
    Weekly,
    /// Unrecognized patterns fall back to daily advancement.
    Custom,
}

impl RecurrencePattern {
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "daily" => RecurrencePattern::Daily,
            "weekdays" => RecurrencePattern::Weekdays,
            "weekly" => RecurrencePattern::Weekly,
            _ => RecurrencePattern::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekdays => "weekdays",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Custom => "custom",
        }
    }
}

// ---------------------------------------------------------------------------
// Event row
// ---------------------------------------------------------------------------

/// Database row for events table.
///
/// Odds are integers scaled by 100 (200 = 2.00x). For `numeric` events
/// `odds_a` applies to open-phase bets and `odds_b` to close-phase bets;
/// for matches `odds_a`/`odds_b`/`odds_draw` are per-side. Single-phase
/// events store their result in `close_result`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub family: String,
    pub status: String,
    pub open_time: Option<DateTime<Utc>>,
    pub close_time: Option<DateTime<Utc>>,
    pub open_result: Option<String>,
    pub close_result: Option<String>,
    pub odds_a: i32,
    pub odds_b: i32,
    pub odds_draw: Option<i32>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub next_open_time: Option<DateTime<Utc>>,
    pub next_close_time: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}
