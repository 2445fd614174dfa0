//! Match clock for both players.
//!
//! After every move the mover's time is charged with the move duration
//! minus the network ping, then the increment is added (or, for
//! correspondence, the clock is reset). Under Compensation Chess each side
//! is additionally credited the material it lost on the move, converted at
//! a fixed time value per pawn.

use chrono::Duration;
use log::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::PAWNS_PER_BASE_TIME;
use crate::game_state::chess_types::Color;
use crate::timing::time_control::TimeControl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    time_control: TimeControl,
    remaining: [Duration; 2],
    pawn_time: Option<Duration>,
    /// Clock readings before each recorded move, for takebacks.
    history: Vec<[Duration; 2]>,
}

impl GameClock {
    pub fn new(time_control: TimeControl, compensation: bool) -> Self {
        let start = time_control.starting_time().unwrap_or_else(Duration::zero);
        let pawn_time = match (&time_control, compensation) {
            (TimeControl::Unlimited, _) | (_, false) => None,
            _ => Some(start / PAWNS_PER_BASE_TIME),
        };
        Self {
            time_control,
            remaining: [start; 2],
            pawn_time,
            history: Vec::new(),
        }
    }

    pub fn time_control(&self) -> &TimeControl {
        &self.time_control
    }

    #[inline]
    pub fn is_timed(&self) -> bool {
        self.time_control != TimeControl::Unlimited
    }

    /// Time left for `color`; `None` for untimed games.
    pub fn remaining(&self, color: Color) -> Option<Duration> {
        self.is_timed().then(|| self.remaining[color.index()])
    }

    pub fn pawn_time(&self) -> Option<Duration> {
        self.pawn_time
    }

    fn charged(elapsed: Duration, ping: Duration) -> Duration {
        (elapsed - ping).max(Duration::zero())
    }

    /// Would spending `elapsed` (minus `ping`) run `color` out of time?
    pub fn would_flag(&self, color: Color, elapsed: Duration, ping: Duration) -> bool {
        self.is_timed() && Self::charged(elapsed, ping) > self.remaining[color.index()]
    }

    /// Charges `color` for a move that took `elapsed`, `ping` of which was
    /// network latency. `material_lost` is indexed by colour.
    pub fn record_move(
        &mut self,
        color: Color,
        elapsed: Duration,
        ping: Duration,
        material_lost: [u32; 2],
    ) -> ChessResult<()> {
        if elapsed < Duration::zero() || ping < Duration::zero() {
            return Err(ChessErrors::InvalidTimeControl(format!(
                "negative move duration {elapsed} or ping {ping}"
            )));
        }
        self.history.push(self.remaining);
        let slot = color.index();
        match &self.time_control {
            TimeControl::Unlimited => return Ok(()),
            TimeControl::Increment { increment, .. } => {
                self.remaining[slot] = self.remaining[slot] - Self::charged(elapsed, ping) + *increment;
            }
            TimeControl::Correspondence { per_move } => {
                self.remaining[slot] = *per_move;
            }
        }
        if let Some(pawn_time) = self.pawn_time {
            for side in Color::ALL {
                let lost = i32::try_from(material_lost[side.index()]).unwrap_or(i32::MAX);
                if lost > 0 {
                    self.remaining[side.index()] = self.remaining[side.index()] + pawn_time * lost;
                }
            }
        }
        debug!(
            "clock after {color:?} move: white {}s, black {}s",
            self.remaining[0].num_seconds(),
            self.remaining[1].num_seconds()
        );
        Ok(())
    }

    /// Restores the readings from before the last recorded move.
    pub fn undo_last_move(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.remaining = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GameClock;
    use crate::game_state::chess_types::Color;
    use crate::timing::time_control::TimeControl;
    use chrono::Duration;

    #[test]
    fn increment_and_ping_compensation() {
        let mut clock = GameClock::new(TimeControl::increment_seconds(60, 2), false);
        clock
            .record_move(Color::Light, Duration::seconds(10), Duration::seconds(1), [0, 0])
            .expect("valid durations");
        assert_eq!(clock.remaining(Color::Light), Some(Duration::seconds(53)));
        assert_eq!(clock.remaining(Color::Dark), Some(Duration::seconds(60)));
        clock.undo_last_move();
        assert_eq!(clock.remaining(Color::Light), Some(Duration::seconds(60)));
    }

    #[test]
    fn ping_never_adds_time() {
        let mut clock = GameClock::new(TimeControl::increment_seconds(60, 0), false);
        clock
            .record_move(Color::Dark, Duration::milliseconds(50), Duration::seconds(1), [0, 0])
            .expect("valid durations");
        assert_eq!(clock.remaining(Color::Dark), Some(Duration::seconds(60)));
    }

    #[test]
    fn flagging() {
        let clock = GameClock::new(TimeControl::increment_seconds(5, 0), false);
        assert!(clock.would_flag(Color::Light, Duration::seconds(6), Duration::zero()));
        assert!(!clock.would_flag(Color::Light, Duration::seconds(6), Duration::seconds(2)));
        assert!(!GameClock::new(TimeControl::Unlimited, false).would_flag(
            Color::Light,
            Duration::days(3),
            Duration::zero()
        ));
    }

    #[test]
    fn correspondence_resets_each_move() {
        let per_move = Duration::days(1);
        let mut clock = GameClock::new(TimeControl::Correspondence { per_move }, false);
        clock
            .record_move(Color::Light, Duration::hours(20), Duration::zero(), [0, 0])
            .expect("valid durations");
        assert_eq!(clock.remaining(Color::Light), Some(per_move));
    }

    #[test]
    fn compensation_credits_lost_material() {
        let mut clock = GameClock::new(TimeControl::increment_seconds(400, 0), true);
        assert_eq!(clock.pawn_time(), Some(Duration::seconds(10)));
        clock
            .record_move(Color::Light, Duration::seconds(4), Duration::zero(), [0, 3])
            .expect("valid durations");
        assert_eq!(clock.remaining(Color::Light), Some(Duration::seconds(396)));
        assert_eq!(clock.remaining(Color::Dark), Some(Duration::seconds(430)));
    }
}
