//! Next-cycle computation for recurring events.
//!
//! Runs only after an event has fully settled. The time-of-day of the
//! open/close window is preserved; only the date advances.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use crate::models::RecurrencePattern;

/// The next open/close window for a recurring event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextCycle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RecurrenceError {
    #[error("recurring event has no open/close times to advance")]
    MissingSchedule,
}

/// Compute the next cycle from the current window.
pub fn next_cycle(
    open_time: Option<DateTime<Utc>>,
    close_time: Option<DateTime<Utc>>,
    pattern: RecurrencePattern,
) -> Result<NextCycle, RecurrenceError> {
    let (open, close) = match (open_time, close_time) {
        (Some(o), Some(c)) => (o, c),
        _ => return Err(RecurrenceError::MissingSchedule),
    };

    Ok(NextCycle {
        open_time: advance(open, pattern),
        close_time: advance(close, pattern),
    })
}

fn advance(ts: DateTime<Utc>, pattern: RecurrencePattern) -> DateTime<Utc> {
    match pattern {
        // Custom patterns are an extension point; they advance daily.
        RecurrencePattern::Daily | RecurrencePattern::Custom => ts + Duration::days(1),
        RecurrencePattern::Weekdays => {
            let mut next = ts + Duration::days(1);
            while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
                next += Duration::days(1);
            }
            next
        }
        RecurrencePattern::Weekly => ts + Duration::days(7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_daily_advances_one_day() {
        // 2026-08-06 is a Thursday.
        let next = next_cycle(
            Some(at(2026, 8, 6, 10, 0)),
            Some(at(2026, 8, 6, 12, 30)),
            RecurrencePattern::Daily,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 7, 10, 0));
        assert_eq!(next.close_time, at(2026, 8, 7, 12, 30));
    }

    #[test]
    fn test_weekdays_skips_weekend() {
        // Friday → Monday.
        let next = next_cycle(
            Some(at(2026, 8, 7, 10, 0)),
            Some(at(2026, 8, 7, 12, 0)),
            RecurrencePattern::Weekdays,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 10, 10, 0));
        assert_eq!(next.open_time.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_weekdays_midweek_behaves_like_daily() {
        let next = next_cycle(
            Some(at(2026, 8, 4, 9, 0)),
            Some(at(2026, 8, 4, 11, 0)),
            RecurrencePattern::Weekdays,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn test_weekly_advances_seven_days() {
        let next = next_cycle(
            Some(at(2026, 8, 6, 10, 0)),
            Some(at(2026, 8, 6, 12, 0)),
            RecurrencePattern::Weekly,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 13, 10, 0));
    }

    #[test]
    fn test_custom_falls_back_to_daily() {
        let next = next_cycle(
            Some(at(2026, 8, 6, 10, 0)),
            Some(at(2026, 8, 6, 12, 0)),
            RecurrencePattern::Custom,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 7, 10, 0));
    }

    #[test]
    fn test_missing_schedule_is_an_error() {
        assert!(matches!(
            next_cycle(None, Some(at(2026, 8, 6, 12, 0)), RecurrencePattern::Daily),
            Err(RecurrenceError::MissingSchedule)
        ));
        assert!(matches!(
            next_cycle(Some(at(2026, 8, 6, 12, 0)), None, RecurrencePattern::Daily),
            Err(RecurrenceError::MissingSchedule)
        ));
    }

    #[test]
    fn test_time_of_day_is_preserved() {
        let next = next_cycle(
            Some(at(2026, 8, 6, 23, 45)),
            Some(at(2026, 8, 7, 1, 15)),
            RecurrencePattern::Daily,
        )
        .unwrap();

        assert_eq!(next.open_time, at(2026, 8, 7, 23, 45));
        assert_eq!(next.close_time, at(2026, 8, 8, 1, 15));
    }
}
