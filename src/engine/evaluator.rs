//! Prediction parsing and scoring.
//!
//! Predictions are typed variants, parsed and validated at placement time
//! before any money moves. The stored form is a tagged string
//! (`close:pair:42`, `open:digit:left:7`, `outcome:team_a`, ...) so
//! settlement never has to infer a mode from the shape of the selection.

use std::fmt;

use crate::models::{Event, GameFamily};

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// Which phase of a two-phase numeric market a bet targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPhase {
    Open,
    Close,
}

impl MarketPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPhase::Open => "open",
            MarketPhase::Close => "close",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(MarketPhase::Open),
            "close" => Some(MarketPhase::Close),
            _ => None,
        }
    }
}

/// Position a single-digit prediction is pinned to within the result pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitPosition {
    Left,
    Right,
    Either,
}

impl DigitPosition {
    fn as_str(&self) -> &'static str {
        match self {
            DigitPosition::Left => "left",
            DigitPosition::Right => "right",
            DigitPosition::Either => "either",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(DigitPosition::Left),
            "right" => Some(DigitPosition::Right),
            "either" => Some(DigitPosition::Either),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    fn as_str(&self) -> &'static str {
        match self {
            Parity::Odd => "odd",
            Parity::Even => "even",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "odd" => Some(Parity::Odd),
            "even" => Some(Parity::Even),
            _ => None,
        }
    }
}

/// Fixed outcome tokens for single-result games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSide {
    TeamA,
    TeamB,
    Draw,
    Heads,
    Tails,
}

impl OutcomeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeSide::TeamA => "team_a",
            OutcomeSide::TeamB => "team_b",
            OutcomeSide::Draw => "draw",
            OutcomeSide::Heads => "heads",
            OutcomeSide::Tails => "tails",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "team_a" => Some(OutcomeSide::TeamA),
            "team_b" => Some(OutcomeSide::TeamB),
            "draw" => Some(OutcomeSide::Draw),
            "heads" => Some(OutcomeSide::Heads),
            "tails" => Some(OutcomeSide::Tails),
            _ => None,
        }
    }

    /// Tokens a coin flip accepts.
    pub fn parse_coin(s: &str) -> Option<Self> {
        match s {
            "heads" => Some(OutcomeSide::Heads),
            "tails" => Some(OutcomeSide::Tails),
            _ => None,
        }
    }
}

impl fmt::Display for OutcomeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// A numeric-market prediction against a two-digit result `00`..`99`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericKind {
    /// Wins iff it equals the declared pair verbatim.
    ExactPair(String),
    /// Wins iff the digit matches the tagged position of the pair.
    SingleDigit { digit: u8, position: DigitPosition },
    /// Wins iff both digits of the pair are members of the chosen set.
    Combination(Vec<u8>),
    /// Wins iff the numeric value of the pair has matching parity.
    Parity(Parity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    Numeric { phase: MarketPhase, kind: NumericKind },
    Outcome(OutcomeSide),
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("unknown bet mode: {0}")]
    UnknownMode(String),

    #[error("malformed {mode} selection: {selection:?}")]
    Malformed { mode: String, selection: String },

    #[error("bet mode {0} is not offered by this event")]
    ModeNotAllowed(String),

    #[error("this event does not offer a draw outcome")]
    DrawNotOffered,

    #[error("stored prediction is unreadable: {0:?}")]
    Unreadable(String),
}

impl Prediction {
    /// Parse a player's selection for the given event family.
    ///
    /// `mode` names the bet type (`exact_pair`, `single_digit`,
    /// `combination`, `parity` for numeric markets; `outcome` for
    /// matches). `phase` defaults to the close phase for numeric bets.
    pub fn parse(
        family: GameFamily,
        mode: &str,
        phase: Option<&str>,
        selection: &str,
        draw_offered: bool,
    ) -> Result<Self, PredictionError> {
        match family {
            GameFamily::Numeric => {
                let phase = match phase {
                    None | Some("") => MarketPhase::Close,
                    Some(p) => MarketPhase::parse(p).ok_or_else(|| PredictionError::Malformed {
                        mode: mode.to_string(),
                        selection: p.to_string(),
                    })?,
                };
                let kind = NumericKind::parse(mode, selection)?;
                Ok(Prediction::Numeric { phase, kind })
            }
            GameFamily::TeamMatch | GameFamily::Toss => {
                if mode != "outcome" {
                    return Err(PredictionError::ModeNotAllowed(mode.to_string()));
                }
                let side = match OutcomeSide::parse(selection) {
                    Some(side @ (OutcomeSide::TeamA | OutcomeSide::TeamB)) => side,
                    Some(OutcomeSide::Draw) if family == GameFamily::TeamMatch => {
                        if !draw_offered {
                            return Err(PredictionError::DrawNotOffered);
                        }
                        OutcomeSide::Draw
                    }
                    _ => {
                        return Err(PredictionError::Malformed {
                            mode: mode.to_string(),
                            selection: selection.to_string(),
                        })
                    }
                };
                Ok(Prediction::Outcome(side))
            }
        }
    }

    /// Stable tagged encoding persisted in `bets.prediction`.
    pub fn to_stored(&self) -> String {
        match self {
            Prediction::Numeric { phase, kind } => match kind {
                NumericKind::ExactPair(pair) => format!("{}:pair:{}", phase.as_str(), pair),
                NumericKind::SingleDigit { digit, position } => {
                    format!("{}:digit:{}:{}", phase.as_str(), position.as_str(), digit)
                }
                NumericKind::Combination(digits) => {
                    let joined = digits
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("{}:combo:{}", phase.as_str(), joined)
                }
                NumericKind::Parity(parity) => {
                    format!("{}:parity:{}", phase.as_str(), parity.as_str())
                }
            },
            Prediction::Outcome(side) => format!("outcome:{}", side.as_str()),
        }
    }

    /// Decode a stored prediction. Settlement maps failures to a loss
    /// rather than propagating them, so scoring always terminates.
    pub fn from_stored(stored: &str) -> Result<Self, PredictionError> {
        let unreadable = || PredictionError::Unreadable(stored.to_string());

        if let Some(token) = stored.strip_prefix("outcome:") {
            let side = OutcomeSide::parse(token).ok_or_else(unreadable)?;
            return Ok(Prediction::Outcome(side));
        }

        let mut parts = stored.splitn(3, ':');
        let phase = parts
            .next()
            .and_then(MarketPhase::parse)
            .ok_or_else(unreadable)?;
        let tag = parts.next().ok_or_else(unreadable)?;
        let rest = parts.next().ok_or_else(unreadable)?;

        let kind = match tag {
            "pair" => NumericKind::parse("exact_pair", rest)?,
            "combo" => NumericKind::parse("combination", rest)?,
            "parity" => NumericKind::parse("parity", rest)?,
            "digit" => {
                let (position, digit) = rest.split_once(':').ok_or_else(unreadable)?;
                let position = DigitPosition::parse(position).ok_or_else(unreadable)?;
                let digit = parse_digit(digit).ok_or_else(unreadable)?;
                NumericKind::SingleDigit { digit, position }
            }
            _ => return Err(unreadable()),
        };

        Ok(Prediction::Numeric { phase, kind })
    }

    /// Phase targeted by this bet; None for single-result games.
    pub fn phase(&self) -> Option<MarketPhase> {
        match self {
            Prediction::Numeric { phase, .. } => Some(*phase),
            Prediction::Outcome(_) => None,
        }
    }

    /// Whether this prediction wins against a declared result string.
    /// Malformed declared results never win.
    pub fn wins_against(&self, declared: &str) -> bool {
        match self {
            Prediction::Numeric { kind, .. } => kind.wins_against(declared),
            Prediction::Outcome(side) => side.as_str() == declared,
        }
    }
}

impl NumericKind {
    fn parse(mode: &str, selection: &str) -> Result<Self, PredictionError> {
        let malformed = || PredictionError::Malformed {
            mode: mode.to_string(),
            selection: selection.to_string(),
        };

        match mode {
            "exact_pair" => {
                if !is_two_digit_pair(selection) {
                    return Err(malformed());
                }
                Ok(NumericKind::ExactPair(selection.to_string()))
            }
            "single_digit" => {
                // "7" matches either position; "left:7" / "right:7" pin one.
                let (position, digit) = match selection.split_once(':') {
                    Some((pos, d)) => (DigitPosition::parse(pos).ok_or_else(malformed)?, d),
                    None => (DigitPosition::Either, selection),
                };
                let digit = parse_digit(digit).ok_or_else(malformed)?;
                Ok(NumericKind::SingleDigit { digit, position })
            }
            "combination" => {
                let mut digits = Vec::new();
                for part in selection.split(',') {
                    let digit = parse_digit(part.trim()).ok_or_else(malformed)?;
                    if !digits.contains(&digit) {
                        digits.push(digit);
                    }
                }
                if digits.is_empty() || digits.len() > 10 {
                    return Err(malformed());
                }
                Ok(NumericKind::Combination(digits))
            }
            "parity" => {
                let parity = Parity::parse(selection).ok_or_else(malformed)?;
                Ok(NumericKind::Parity(parity))
            }
            _ => Err(PredictionError::UnknownMode(mode.to_string())),
        }
    }

    /// Score against a declared two-digit result.
    pub fn wins_against(&self, declared: &str) -> bool {
        let Some((left, right)) = split_pair(declared) else {
            return false;
        };

        match self {
            NumericKind::ExactPair(pair) => pair == declared,
            NumericKind::SingleDigit { digit, position } => match position {
                DigitPosition::Left => *digit == left,
                DigitPosition::Right => *digit == right,
                DigitPosition::Either => *digit == left || *digit == right,
            },
            NumericKind::Combination(digits) => {
                digits.contains(&left) && digits.contains(&right)
            }
            NumericKind::Parity(parity) => {
                let value = left as u32 * 10 + right as u32;
                match parity {
                    Parity::Odd => value % 2 == 1,
                    Parity::Even => value % 2 == 0,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Verdict for one bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub won: bool,
    pub payout: i64,
}

impl Evaluation {
    pub const LOST: Evaluation = Evaluation { won: false, payout: 0 };
}

/// Winning payout: floor(stake × odds / 100). Odds are scaled by 100.
pub fn payout(stake: i64, odds: i32) -> i64 {
    stake.saturating_mul(odds as i64) / 100
}

/// Score a prediction against a declared result at the given odds.
pub fn evaluate(prediction: &Prediction, declared: &str, odds: i32, stake: i64) -> Evaluation {
    if prediction.wins_against(declared) {
        Evaluation {
            won: true,
            payout: payout(stake, odds),
        }
    } else {
        Evaluation::LOST
    }
}

/// Odds applicable to a prediction on the given event.
///
/// Numeric markets pay `odds_a` on the open phase and `odds_b` on the
/// close phase; matches pay per predicted side. Coin-flip sides have no
/// event and take their odds from configuration.
pub fn odds_for(prediction: &Prediction, event: &Event) -> Option<i32> {
    match prediction {
        Prediction::Numeric { phase: MarketPhase::Open, .. } => Some(event.odds_a),
        Prediction::Numeric { phase: MarketPhase::Close, .. } => Some(event.odds_b),
        Prediction::Outcome(OutcomeSide::TeamA) => Some(event.odds_a),
        Prediction::Outcome(OutcomeSide::TeamB) => Some(event.odds_b),
        Prediction::Outcome(OutcomeSide::Draw) => event.odds_draw,
        Prediction::Outcome(OutcomeSide::Heads | OutcomeSide::Tails) => None,
    }
}

/// True for exactly two ASCII digits (`00`..`99`).
pub fn is_two_digit_pair(s: &str) -> bool {
    split_pair(s).is_some()
}

fn split_pair(s: &str) -> Option<(u8, u8)> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return None;
    }
    Some((bytes[0] - b'0', bytes[1] - b'0'))
}

fn parse_digit(s: &str) -> Option<u8> {
    let bytes = s.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii_digit() {
        return None;
    }
    Some(bytes[0] - b'0')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(mode: &str, selection: &str) -> Prediction {
        Prediction::parse(GameFamily::Numeric, mode, Some("close"), selection, false)
            .expect("selection should parse")
    }

    #[test]
    fn test_exact_pair_verbatim_match() {
        let p = numeric("exact_pair", "42");
        assert!(p.wins_against("42"));
        assert!(!p.wins_against("24"));
        assert!(!p.wins_against("13"));
    }

    #[test]
    fn test_exact_pair_rejects_bad_selection() {
        for bad in ["4", "427", "4x", "", " 42"] {
            assert!(
                Prediction::parse(GameFamily::Numeric, "exact_pair", None, bad, false).is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_single_digit_positions() {
        let left = numeric("single_digit", "left:4");
        assert!(left.wins_against("42"));
        assert!(!left.wins_against("24"));

        let right = numeric("single_digit", "right:4");
        assert!(!right.wins_against("42"));
        assert!(right.wins_against("24"));

        let either = numeric("single_digit", "4");
        assert!(either.wins_against("42"));
        assert!(either.wins_against("24"));
        assert!(!either.wins_against("13"));
    }

    #[test]
    fn test_combination_pairs_from_set() {
        let p = numeric("combination", "1,2,3");
        // Any ordered pair drawn from {1,2,3} wins, including doubles.
        assert!(p.wins_against("12"));
        assert!(p.wins_against("31"));
        assert!(p.wins_against("22"));
        assert!(!p.wins_against("14"));
        assert!(!p.wins_against("45"));
    }

    #[test]
    fn test_combination_dedups_digits() {
        let p = numeric("combination", "7,7,7");
        match p {
            Prediction::Numeric { kind: NumericKind::Combination(digits), .. } => {
                assert_eq!(digits, vec![7]);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn test_parity() {
        let even = numeric("parity", "even");
        assert!(even.wins_against("42"));
        assert!(!even.wins_against("43"));
        assert!(even.wins_against("00"));

        let odd = numeric("parity", "odd");
        assert!(odd.wins_against("43"));
        assert!(!odd.wins_against("42"));
    }

    #[test]
    fn test_outcome_tokens() {
        let p = Prediction::parse(GameFamily::TeamMatch, "outcome", None, "team_a", false)
            .expect("team_a should parse");
        assert!(p.wins_against("team_a"));
        assert!(!p.wins_against("team_b"));
    }

    #[test]
    fn test_draw_requires_draw_odds() {
        assert!(matches!(
            Prediction::parse(GameFamily::TeamMatch, "outcome", None, "draw", false),
            Err(PredictionError::DrawNotOffered)
        ));
        assert!(
            Prediction::parse(GameFamily::TeamMatch, "outcome", None, "draw", true).is_ok()
        );
    }

    #[test]
    fn test_toss_has_no_draw() {
        assert!(Prediction::parse(GameFamily::Toss, "outcome", None, "draw", true).is_err());
        assert!(Prediction::parse(GameFamily::Toss, "outcome", None, "team_b", false).is_ok());
    }

    #[test]
    fn test_numeric_mode_not_valid_for_match() {
        assert!(matches!(
            Prediction::parse(GameFamily::TeamMatch, "exact_pair", None, "42", false),
            Err(PredictionError::ModeNotAllowed(_))
        ));
    }

    #[test]
    fn test_stored_round_trip() {
        let cases = [
            numeric("exact_pair", "07"),
            numeric("single_digit", "left:9"),
            numeric("single_digit", "5"),
            numeric("combination", "0,5,9"),
            numeric("parity", "odd"),
            Prediction::Outcome(OutcomeSide::TeamB),
            Prediction::Outcome(OutcomeSide::Heads),
        ];
        for p in cases {
            let stored = p.to_stored();
            let back = Prediction::from_stored(&stored)
                .unwrap_or_else(|e| panic!("{stored:?} should decode: {e}"));
            assert_eq!(back, p, "round trip through {stored:?}");
        }
    }

    #[test]
    fn test_from_stored_rejects_garbage() {
        for bad in ["", "pair:42", "close:pair:4", "open:digit:7", "jodi:42", "outcome:maybe"] {
            assert!(Prediction::from_stored(bad).is_err(), "{bad:?} should not decode");
        }
    }

    #[test]
    fn test_payout_is_floored() {
        assert_eq!(payout(100, 200), 200);
        assert_eq!(payout(100, 900), 900);
        assert_eq!(payout(3, 150), 4); // floor(4.5)
        assert_eq!(payout(1, 95), 0);
    }

    #[test]
    fn test_evaluate_win_and_loss() {
        let p = numeric("exact_pair", "42");
        let win = evaluate(&p, "42", 900, 100);
        assert!(win.won);
        assert_eq!(win.payout, 900);

        let loss = evaluate(&p, "13", 900, 100);
        assert!(!loss.won);
        assert_eq!(loss.payout, 0);
    }

    #[test]
    fn test_malformed_declared_result_never_wins() {
        let p = numeric("parity", "even");
        assert!(!p.wins_against("4"));
        assert!(!p.wins_against("4x"));
        assert!(!p.wins_against(""));
    }
}
