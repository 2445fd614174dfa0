//! Committing player moves to the game transcript.
//!
//! `register_move` is the single entry point for a move a player actually
//! makes: it validates the request against the legal move list, commits it
//! through `perform_move`, evaluates the outcome and appends the history
//! entry. A rejected request leaves the position untouched.

use log::{debug, info, warn};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_outcome::{evaluate_outcome, GameResult, GameStatus, WinReason};
use crate::game_state::move_record::MoveRecord;
use crate::game_state::undo_state::revert_move;
use crate::move_generation::legal_move_apply::{perform_move, MoveMode};
use crate::move_generation::legal_move_generator::{legal_moves, normalize_move};
use crate::utils::long_algebraic::{move_to_long_algebraic, parse_uci_move};
use crate::utils::standard_algebraic::{move_to_san, parse_san_move, san_to_figurine};

/// What the surrounding system needs to know after a committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSignal {
    pub capture: bool,
    pub check: bool,
    /// Set when this move ended the game.
    pub result: Option<GameResult>,
}

fn reject_reason(game_state: &GameState, mv: &ChessMove, legal: &[ChessMove]) -> ChessErrors {
    let text = move_to_long_algebraic(game_state, mv);
    let same_path = |other: &&ChessMove| other.from == mv.from && other.to == mv.to;
    let promotes = legal.iter().filter(same_path).any(|other| other.promotion.is_some());
    if promotes || (mv.promotion.is_some() && legal.iter().any(|other| same_path(&other))) {
        return ChessErrors::InvalidPromotion(text);
    }
    ChessErrors::IllegalMove(text)
}

/// Validates and commits `mv` for the side to move.
pub fn register_move(game_state: &mut GameState, mv: &ChessMove) -> ChessResult<MoveSignal> {
    if game_state.status != GameStatus::Ongoing {
        return Err(ChessErrors::GameFinished);
    }

    let mv = normalize_move(game_state, mv);
    let legal = legal_moves(game_state);
    if !legal.contains(&mv) {
        let error = reject_reason(game_state, &mv, &legal);
        warn!("rejected move request: {error}");
        return Err(error);
    }

    let color = game_state.side_to_move;
    let san = move_to_san(game_state, &mv, &legal);
    let uci = move_to_long_algebraic(game_state, &mv);

    let applied = perform_move(game_state, &mv, MoveMode::Commit)?;
    let result = evaluate_outcome(game_state, color);
    if let Some(result) = result {
        game_state.status = GameStatus::Finished;
        game_state.result = Some(result);
        info!("game finished after {uci}: {result}");
    }

    let mut san = san;
    if matches!(result, Some(GameResult::Win { reason: WinReason::Checkmate, .. })) {
        san.push('#');
    } else if game_state.in_check {
        san.push('+');
    }
    let figurine = san_to_figurine(&san, color);
    debug!("{color:?} played {san} ({uci})");

    let signal = MoveSignal {
        capture: applied.captured.is_some(),
        check: game_state.in_check,
        result,
    };
    game_state.move_history.push(MoveRecord {
        chess_move: mv,
        color,
        piece_kind: applied.mover_kind,
        san,
        figurine,
        uci,
        capture: applied.captured.is_some(),
        castling: applied.castling,
        material_lost: applied.material_lost,
        undo: applied.undo,
    });
    Ok(signal)
}

/// Accepts either a UCI string or a SAN token.
pub fn register_any_move(game_state: &mut GameState, text: &str) -> ChessResult<MoveSignal> {
    let mv = match parse_uci_move(game_state, text) {
        Ok(mv) => mv,
        Err(_) => parse_san_move(game_state, text)?,
    };
    register_move(game_state, &mv)
}

/// Takes back the last registered move, restoring status and result too.
pub fn undo_last_move(game_state: &mut GameState) -> ChessResult<MoveRecord> {
    let record = game_state.move_history.pop().ok_or(ChessErrors::NothingToUndo)?;
    revert_move(game_state, record.undo.clone());
    debug!("took back {}", record.uci);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::{register_any_move, register_move, undo_last_move};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_outcome::{DrawReason, GameResult, GameStatus, WinReason};
    use crate::game_state::variants::{Variant, VariantSet};

    fn start(variants: &[Variant]) -> GameState {
        GameState::from_fen(VariantSet::of(variants), STARTING_POSITION_FEN).expect("start position should parse")
    }

    fn play(state: &mut GameState, moves: &[&str]) {
        for text in moves {
            register_any_move(state, text).expect("move should register");
        }
    }

    #[test]
    fn fools_mate_finishes_the_game() {
        let mut state = start(&[]);
        play(&mut state, &["f2f3", "e7e5", "g2g4"]);
        let signal = register_any_move(&mut state, "d8h4").expect("mate should register");
        assert!(signal.check);
        assert_eq!(
            signal.result,
            Some(GameResult::Win { winner: Color::Dark, reason: WinReason::Checkmate })
        );
        assert_eq!(state.status, GameStatus::Finished);
        assert_eq!(state.move_history.last().map(|record| record.san.as_str()), Some("Qh4#"));
        assert_eq!(register_any_move(&mut state, "a2a3").err(), Some(ChessErrors::GameFinished));
    }

    #[test]
    fn threefold_repetition_on_the_third_occurrence() {
        let mut state = start(&[]);
        play(&mut state, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1"]);
        assert_eq!(state.status, GameStatus::Ongoing);
        let signal = register_any_move(&mut state, "Ng8").expect("move should register");
        assert_eq!(signal.result, Some(GameResult::Draw(DrawReason::ThreefoldRepetition)));
    }

    fn finish(variants: &[Variant], fen: &str, moves: &[&str]) -> (GameState, Option<GameResult>) {
        let mut state = GameState::from_fen(VariantSet::of(variants), fen).expect("position should parse");
        let (last, before) = moves.split_last().expect("at least one move");
        play(&mut state, before);
        let signal = register_any_move(&mut state, last).expect("final move should register");
        (state, signal.result)
    }

    fn win(winner: Color, reason: WinReason) -> Option<GameResult> {
        Some(GameResult::Win { winner, reason })
    }

    #[test]
    fn atomic_king_blown_up() {
        let (state, result) = finish(&[Variant::Atomic], "4k3/4p3/8/8/8/8/4Q3/4K3 w - - 0 1", &["e2e7"]);
        assert_eq!(result, win(Color::Light, WinReason::KingExploded));
        assert_eq!(state.status, GameStatus::Finished);
    }

    #[test]
    fn dark_chess_king_captured() {
        let (_, result) = finish(
            &[Variant::DarkChess],
            "4k3/8/8/8/8/8/8/3R1K2 b - - 0 1",
            &["e8d7", "d1d7"],
        );
        assert_eq!(result, win(Color::Light, WinReason::KingCaptured));
    }

    #[test]
    fn horde_wiped_out() {
        let (_, result) = finish(&[Variant::Horde], "4k3/8/8/8/8/8/3P4/3q4 b - - 0 1", &["d1d2"]);
        assert_eq!(result, win(Color::Dark, WinReason::HordeDestroyed));
    }

    #[test]
    fn antichess_side_without_pieces_wins() {
        let (_, result) = finish(&[Variant::Antichess], "8/8/8/8/8/8/3p4/4B3 w - - 0 1", &["e1d2"]);
        assert_eq!(result, win(Color::Dark, WinReason::LostAllPieces));
    }

    #[test]
    fn antichess_stalemated_side_wins() {
        let (_, result) = finish(&[Variant::Antichess], "8/p7/8/P7/8/8/8/8 w - - 0 1", &["a5a6"]);
        assert_eq!(result, win(Color::Dark, WinReason::Stalemate));
    }

    #[test]
    fn benedict_king_changes_sides() {
        let (state, result) =
            finish(&[Variant::BenedictChess], "4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &["a1a8"]);
        assert_eq!(result, win(Color::Light, WinReason::KingFlipped));
        let king = state.piece_at(Square::new(0, 4, 7)).expect("king still on e8");
        assert_eq!(state.pieces[king].color, Color::Light);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let (_, result) = finish(&[], "k7/8/8/8/8/8/1Q6/K7 w - - 0 1", &["b2b6"]);
        assert_eq!(result, Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn fifty_move_rule_draw() {
        let fen = "k7/8/8/8/8/8/8/K5Rr w - - 98 80";
        let mut state = GameState::from_fen(VariantSet::empty(), fen).expect("position should parse");
        play(&mut state, &["a1a2"]);
        assert_eq!(state.status, GameStatus::Ongoing);
        let signal = register_any_move(&mut state, "h1h5").expect("move should register");
        assert_eq!(signal.result, Some(GameResult::Draw(DrawReason::FiftyMoveRule)));
    }

    #[test]
    fn rejected_requests_leave_the_position_alone() {
        let mut state = start(&[]);
        let fen = state.get_fen();
        let illegal = ChessMove::new(Square::new(0, 4, 1), Square::new(0, 4, 4));
        assert!(matches!(register_move(&mut state, &illegal), Err(ChessErrors::IllegalMove(_))));
        assert_eq!(state.get_fen(), fen);

        let mut promoting = GameState::from_fen(VariantSet::empty(), "k7/4P3/8/8/8/8/8/4K3 w - - 0 1")
            .expect("position should parse");
        let bare = ChessMove::new(Square::new(0, 4, 6), Square::new(0, 4, 7));
        assert!(matches!(register_move(&mut promoting, &bare), Err(ChessErrors::InvalidPromotion(_))));
        let king = ChessMove::with_promotion(Square::new(0, 4, 6), Square::new(0, 4, 7), PieceKind::King);
        assert!(matches!(register_move(&mut promoting, &king), Err(ChessErrors::InvalidPromotion(_))));
    }

    #[test]
    fn undo_restores_status_and_transcript() {
        let mut state = start(&[]);
        play(&mut state, &["f2f3", "e7e5", "g2g4", "Qh4"]);
        let record = undo_last_move(&mut state).expect("a move to take back");
        assert_eq!(record.uci, "d8h4");
        assert_eq!(state.status, GameStatus::Ongoing);
        assert_eq!(state.result, None);
        assert_eq!(state.get_fen(), "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2");
        while undo_last_move(&mut state).is_ok() {}
        assert_eq!(state.get_fen(), STARTING_POSITION_FEN);
        assert_eq!(state.repetitions.len(), 1);
        assert_eq!(undo_last_move(&mut state).err(), Some(ChessErrors::NothingToUndo));
    }

    #[test]
    fn records_carry_all_notations() {
        let mut state = start(&[]);
        play(&mut state, &["e4", "d5", "exd5"]);
        let record = state.move_history.last().expect("three moves recorded");
        assert_eq!(record.san, "exd5");
        assert_eq!(record.uci, "e4d5");
        assert!(record.capture);
        assert_eq!(record.material_lost, [0, 1]);

        play(&mut state, &["Qxd5"]);
        let record = state.move_history.last().expect("four moves recorded");
        assert_eq!(record.figurine, "♛xd5");
    }

    #[test]
    fn third_check_wins() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::ThreeCheck]),
            "4k3/8/8/8/8/8/8/R3K3 w - - 0 1 +2+0",
        )
        .expect("three-check position should parse");
        let signal = register_any_move(&mut state, "Ra8+").expect("check should register");
        assert_eq!(state.checks_given, [3, 0]);
        assert_eq!(
            signal.result,
            Some(GameResult::Win { winner: Color::Light, reason: WinReason::ThreeChecks })
        );
    }
}
