//! Time-control descriptors and their PGN `TimeControl` tag form.
//!
//! Tag forms: `-` (unlimited), `N` (N seconds, no increment), `N+M`
//! (N seconds plus M per move), `1/S` (correspondence, S seconds per move).

use std::fmt;

use chrono::Duration;

use crate::chess_errors::{ChessErrors, ChessResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeControl {
    #[default]
    Unlimited,
    Increment {
        base: Duration,
        increment: Duration,
    },
    /// Each move must be made within `per_move`; the clock resets after it.
    Correspondence { per_move: Duration },
}

impl TimeControl {
    pub fn increment_seconds(base: i64, increment: i64) -> Self {
        TimeControl::Increment {
            base: Duration::seconds(base),
            increment: Duration::seconds(increment),
        }
    }

    /// Time both players start with. `None` when there is no clock.
    pub fn starting_time(&self) -> Option<Duration> {
        match self {
            TimeControl::Unlimited => None,
            TimeControl::Increment { base, .. } => Some(*base),
            TimeControl::Correspondence { per_move } => Some(*per_move),
        }
    }

    pub fn parse(text: &str) -> ChessResult<Self> {
        let invalid = || ChessErrors::InvalidTimeControl(text.to_owned());
        let seconds = |part: &str| -> ChessResult<Duration> {
            let value: i64 = part.trim().parse().map_err(|_| invalid())?;
            if value < 0 {
                return Err(invalid());
            }
            Duration::try_seconds(value).ok_or_else(invalid)
        };

        let text = text.trim();
        if text.is_empty() || text == "-" || text == "?" {
            return Ok(TimeControl::Unlimited);
        }
        if let Some((moves, per_move)) = text.split_once('/') {
            if moves.trim() != "1" {
                return Err(invalid());
            }
            let per_move = seconds(per_move)?;
            if per_move <= Duration::zero() {
                return Err(invalid());
            }
            return Ok(TimeControl::Correspondence { per_move });
        }
        let (base, increment) = match text.split_once('+') {
            Some((base, increment)) => (seconds(base)?, seconds(increment)?),
            None => (seconds(text)?, Duration::zero()),
        };
        if base <= Duration::zero() {
            return Err(invalid());
        }
        Ok(TimeControl::Increment { base, increment })
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeControl::Unlimited => write!(f, "-"),
            TimeControl::Increment { base, increment } if increment.is_zero() => {
                write!(f, "{}", base.num_seconds())
            }
            TimeControl::Increment { base, increment } => {
                write!(f, "{}+{}", base.num_seconds(), increment.num_seconds())
            }
            TimeControl::Correspondence { per_move } => write!(f, "1/{}", per_move.num_seconds()),
        }
    }
}
