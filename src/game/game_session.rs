//! The `Game` facade.
//!
//! Owns the position, the clock and the Dark Chess views, and runs every
//! committed move through the same pipeline: move engine, outcome,
//! transcript, visibility, clock. Results that do not come from the board
//! (resignation, time forfeit, agreed draws, aborts) are applied here.

use std::collections::BTreeMap;

use chrono::Duration;
use log::{info, warn};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_outcome::{DrawReason, GameResult, GameStatus, WinReason};
use crate::game_state::move_record::MoveRecord;
use crate::move_generation::legal_move_generator::{allowed_moves, legal_moves};
use crate::move_generation::move_registration::{self, MoveSignal};
use crate::timing::game_clock::GameClock;
use crate::utils::long_algebraic::parse_uci_move;
use crate::utils::pgn::{close_by_termination, default_headers, parse_pgn, write_pgn_with_headers};
use crate::utils::standard_algebraic::parse_san_move;
use crate::visibility::dark_chess::{DarkChessTracker, DarkChessView};

/// Tags derived from the game itself; everything else is passed through.
const DERIVED_TAGS: [&str; 6] = ["Result", "Variant", "TimeControl", "Termination", "SetUp", "FEN"];

#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    state: GameState,
    clock: GameClock,
    dark_chess: Option<DarkChessTracker>,
    headers: BTreeMap<String, String>,
}

impl Game {
    pub fn new(config: GameConfig) -> ChessResult<Self> {
        let state = GameState::new(&config)?;
        let clock = GameClock::new(config.time_control.clone(), state.rules.compensation);
        let dark_chess = state
            .rules
            .dark
            .then(|| DarkChessTracker::new(&state, config.rng()));
        info!("new {} game: {}", state.variants, state.get_fen());
        Ok(Self {
            config,
            state,
            clock,
            dark_chess,
            headers: BTreeMap::new(),
        })
    }

    /// Replays a PGN game. Board-independent endings recorded in the
    /// `Result`/`Termination` tags are carried over.
    pub fn from_pgn(text: &str) -> ChessResult<Self> {
        let pgn = parse_pgn(text)?;
        let mut game = Self::new(pgn.config.clone())?;
        for token in &pgn.moves {
            if let Err(error) = game.register_any_move(token) {
                warn!("PGN replay stopped at '{token}' after {} moves: {error}", game.history().len());
                return Err(error);
            }
        }
        close_by_termination(&mut game.state, &pgn.result, pgn.termination());
        game.headers = pgn
            .headers
            .into_iter()
            .filter(|(key, _)| !DERIVED_TAGS.contains(&key.as_str()))
            .collect();
        Ok(game)
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn fen(&self) -> String {
        self.state.get_fen()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.state.move_history
    }

    pub fn legal_moves(&mut self) -> Vec<ChessMove> {
        legal_moves(&mut self.state)
    }

    /// Legal destinations of the piece on `square`.
    pub fn allowed_moves(&mut self, square: Square) -> Vec<Square> {
        match self.state.piece_at(square) {
            Some(piece) if self.state.pieces[piece].color == self.state.side_to_move => {
                allowed_moves(&mut self.state, piece)
            }
            _ => Vec::new(),
        }
    }

    /// Sets a PGN tag such as `Event` or `White`.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Commits `mv` without charging the clock.
    pub fn register_move(&mut self, mv: &ChessMove) -> ChessResult<MoveSignal> {
        self.register_timed_move(mv, Duration::zero(), Duration::zero())
    }

    /// Commits `mv` that took `elapsed`, `ping` of which was network
    /// latency. A move arriving after the mover's flag fell is not played:
    /// the game ends on time and `GameFinished` is returned.
    pub fn register_timed_move(
        &mut self,
        mv: &ChessMove,
        elapsed: Duration,
        ping: Duration,
    ) -> ChessResult<MoveSignal> {
        let color = self.state.side_to_move;
        if self.state.is_ongoing() && self.clock.would_flag(color, elapsed, ping) {
            self.flag(color)?;
            return Err(ChessErrors::GameFinished);
        }

        let signal = move_registration::register_move(&mut self.state, mv)?;
        let record = self
            .state
            .move_history
            .last()
            .ok_or_else(|| ChessErrors::InternalInvariant("registered move missing from history".to_owned()))?;
        if let Some(tracker) = &mut self.dark_chess {
            tracker.record_move(&self.state, record);
        }
        if let Err(error) = self.clock.record_move(color, elapsed, ping, record.material_lost) {
            // Keep the views and the history in step before reporting.
            if let Some(tracker) = &mut self.dark_chess {
                tracker.undo_last_move();
            }
            move_registration::undo_last_move(&mut self.state)?;
            return Err(error);
        }
        Ok(signal)
    }

    /// Accepts a UCI string or a SAN token.
    pub fn register_any_move(&mut self, text: &str) -> ChessResult<MoveSignal> {
        let mv = match parse_uci_move(&self.state, text) {
            Ok(mv) => mv,
            Err(_) => parse_san_move(&mut self.state, text)?,
        };
        self.register_move(&mv)
    }

    /// Takes back the last move. Games ended by resignation, time,
    /// agreement or abort stay ended.
    pub fn undo_last_move(&mut self) -> ChessResult<MoveRecord> {
        let closed_off_board = self.state.status == GameStatus::Aborted
            || matches!(
                self.state.result,
                Some(GameResult::Win {
                    reason: WinReason::Resignation | WinReason::TimeForfeit,
                    ..
                }) | Some(GameResult::Draw(DrawReason::Agreement))
            );
        if closed_off_board {
            return Err(ChessErrors::GameFinished);
        }
        let record = move_registration::undo_last_move(&mut self.state)?;
        if let Some(tracker) = &mut self.dark_chess {
            tracker.undo_last_move();
        }
        self.clock.undo_last_move();
        Ok(record)
    }

    fn finish(&mut self, result: GameResult) -> ChessResult<GameResult> {
        if !self.state.is_ongoing() {
            return Err(ChessErrors::GameFinished);
        }
        self.state.status = GameStatus::Finished;
        self.state.result = Some(result);
        info!("game finished: {result}");
        Ok(result)
    }

    pub fn resign(&mut self, color: Color) -> ChessResult<GameResult> {
        self.finish(GameResult::Win {
            winner: color.opposite(),
            reason: WinReason::Resignation,
        })
    }

    /// `color` ran out of time.
    pub fn flag(&mut self, color: Color) -> ChessResult<GameResult> {
        self.finish(GameResult::Win {
            winner: color.opposite(),
            reason: WinReason::TimeForfeit,
        })
    }

    pub fn draw_by_agreement(&mut self) -> ChessResult<GameResult> {
        self.finish(GameResult::Draw(DrawReason::Agreement))
    }

    pub fn abort(&mut self) -> ChessResult<()> {
        if !self.state.is_ongoing() {
            return Err(ChessErrors::GameFinished);
        }
        self.state.status = GameStatus::Aborted;
        info!("game aborted after {} moves", self.state.move_history.len());
        Ok(())
    }

    pub fn to_pgn(&self) -> String {
        let mut headers = default_headers(&self.state, &self.config.time_control);
        for (key, value) in &self.headers {
            headers.insert(key.clone(), value.clone());
        }
        write_pgn_with_headers(&self.state, &headers)
    }

    /// The private view of `color`; `None` unless Dark Chess is enabled.
    pub fn dark_chess_view(&self, color: Color) -> Option<&DarkChessView> {
        self.dark_chess.as_ref().map(|tracker| tracker.view(color))
    }
}
