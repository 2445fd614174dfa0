//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal candidates for every piece and pocket, then keeps
//! those that survive a simulated `perform_move`/`revert_move` cycle.
//! Antichess mandatory captures are applied last, over the legal set.

use crate::game_state::castling::{castling_side_for_move, castling_target};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::revert_move;
use crate::move_generation::legal_move_apply::{is_capture, perform_move, MoveMode};
use crate::move_generation::move_generator::{possible_moves, SquareMode};
use crate::moves::drop_moves::generate_drop_moves;

/// Pseudo-legal moves for `color`: piece targets with promotions expanded,
/// followed by pocket drops.
pub fn candidate_moves(game_state: &GameState, color: Color) -> Vec<ChessMove> {
    let mut out = Vec::with_capacity(64);
    let promotion_kinds = game_state.rules.promotion_kinds();
    for idx in game_state.pieces_on_board(color) {
        let piece = &game_state.pieces[idx];
        let Some(from) = piece.square() else {
            continue;
        };
        for to in possible_moves(game_state, idx, SquareMode::ForActualMove) {
            if piece.kind == PieceKind::Pawn && game_state.geometry.is_promotion_square(to, color) {
                out.extend(
                    promotion_kinds
                        .iter()
                        .map(|kind| ChessMove::with_promotion(from, to, *kind)),
                );
            } else {
                out.push(ChessMove::new(from, to));
            }
        }
    }
    generate_drop_moves(game_state, color, &mut out);
    if game_state.rules.captures_forbidden {
        out.retain(|mv| !is_capture(game_state, mv));
    }
    out
}

/// Simulates `mv` and reports whether the mover's position survives it.
fn survives(game_state: &mut GameState, mv: &ChessMove) -> bool {
    match perform_move(game_state, mv, MoveMode::LegalityProbe) {
        Ok(applied) => {
            let legal = applied.legal;
            revert_move(game_state, applied.undo);
            legal
        }
        Err(_) => false,
    }
}

/// Every legal move for the side to move.
pub fn legal_moves(game_state: &mut GameState) -> Vec<ChessMove> {
    let color = game_state.side_to_move;
    let candidates = candidate_moves(game_state, color);
    let mut legal: Vec<(ChessMove, bool)> = Vec::with_capacity(candidates.len());
    for mv in candidates {
        let capture = is_capture(game_state, &mv);
        if survives(game_state, &mv) {
            legal.push((mv, capture));
        }
    }
    if game_state.rules.captures_mandatory && legal.iter().any(|(_, capture)| *capture) {
        legal.retain(|(_, capture)| *capture);
    }
    legal.into_iter().map(|(mv, _)| mv).collect()
}

/// Does the side to move have at least one legal move? Mandatory captures
/// never empty a non-empty set, so the first survivor answers.
pub fn has_any_legal_move(game_state: &mut GameState) -> bool {
    let color = game_state.side_to_move;
    candidate_moves(game_state, color)
        .iter()
        .any(|mv| survives(game_state, mv))
}

/// Legal destinations of the piece at `piece`.
pub fn allowed_moves(game_state: &mut GameState, piece: PieceIndex) -> Vec<Square> {
    let Some(from) = game_state.pieces[piece].square() else {
        return Vec::new();
    };
    let mut targets: Vec<Square> = legal_moves(game_state)
        .into_iter()
        .filter(|mv| mv.from_square() == Some(from))
        .map(|mv| mv.to)
        .collect();
    targets.dedup();
    targets
}

/// Rewrites a castling request addressed to the rook's square (or to the
/// landing square) to the canonical castling target.
pub fn normalize_move(game_state: &GameState, mv: &ChessMove) -> ChessMove {
    match castling_side_for_move(game_state, mv) {
        Some(plan) => ChessMove {
            to: castling_target(game_state, &plan),
            promotion: None,
            ..*mv
        },
        None => *mv,
    }
}

pub fn is_move_legal(game_state: &mut GameState, mv: &ChessMove) -> bool {
    let mv = normalize_move(game_state, mv);
    legal_moves(game_state).contains(&mv)
}

#[cfg(test)]
mod tests {
    use super::{allowed_moves, has_any_legal_move, is_move_legal, legal_moves, normalize_move};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::legal_move_apply::{perform_move, MoveMode};
    use crate::utils::long_algebraic::parse_uci_move;

    fn state(variants: &[Variant], fen: &str) -> GameState {
        GameState::from_fen(VariantSet::of(variants), fen).expect("position should parse")
    }

    #[test]
    fn twenty_moves_from_the_start() {
        let mut state = state(&[], STARTING_POSITION_FEN);
        assert_eq!(legal_moves(&mut state).len(), 20);
        assert_eq!(state.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        let mut state = state(&[], "4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
        let knight = state.piece_at(Square::new(0, 4, 1)).expect("knight on e2");
        assert!(allowed_moves(&mut state, knight).is_empty());
    }

    #[test]
    fn promotions_are_expanded() {
        let mut state = state(&[], "k7/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let promotions = legal_moves(&mut state)
            .into_iter()
            .filter(|mv| mv.promotion.is_some())
            .count();
        assert_eq!(promotions, 4);
    }

    #[test]
    fn antichess_captures_are_mandatory() {
        let mut state = state(&[Variant::Antichess], "8/8/8/3p4/4P3/8/8/8 w - - 0 1");
        let moves = legal_moves(&mut state);
        assert_eq!(moves, vec![ChessMove::new(Square::new(0, 4, 3), Square::new(0, 3, 4))]);
    }

    #[test]
    fn atomic_capture_blowing_up_both_kings_is_illegal() {
        let fen = "4R3/8/8/8/3Knk2/8/8/8 w - - 0 1";
        let mut state = state(&[Variant::Atomic], fen);
        let capture = ChessMove::new(Square::new(0, 4, 7), Square::new(0, 4, 3));
        assert!(!is_move_legal(&mut state, &capture));
        assert!(!legal_moves(&mut state).contains(&capture));
        assert_eq!(state.get_fen(), fen);
    }

    #[test]
    fn antichess_promotes_to_king_too() {
        let mut state = state(&[Variant::Antichess], "8/4P2p/8/8/8/8/8/8 w - - 0 1");
        let promotions = legal_moves(&mut state)
            .into_iter()
            .filter(|mv| mv.promotion.is_some())
            .count();
        assert_eq!(promotions, 5);
    }

    #[test]
    fn benedict_never_offers_captures() {
        let mut state = state(&[Variant::BenedictChess], "4k3/8/8/8/8/8/4p3/3RK3 w - - 0 1");
        let rook = state.piece_at(Square::new(0, 3, 0)).expect("rook on d1");
        assert!(!allowed_moves(&mut state, rook).contains(&Square::new(0, 4, 1)));
        let king = state.piece_at(Square::new(0, 4, 0)).expect("king on e1");
        assert!(!allowed_moves(&mut state, king).contains(&Square::new(0, 4, 1)));
    }

    #[test]
    fn king_takes_rook_is_accepted_as_castling() {
        let mut state = state(&[], "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let rook_form = ChessMove::new(Square::new(0, 4, 0), Square::new(0, 7, 0));
        assert_eq!(
            normalize_move(&state, &rook_form),
            ChessMove::new(Square::new(0, 4, 0), Square::new(0, 6, 0))
        );
        assert!(is_move_legal(&mut state, &rook_form));
    }

    #[test]
    fn checkmated_side_has_no_moves() {
        let mut state = state(&[], STARTING_POSITION_FEN);
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let mv = parse_uci_move(&state, uci).expect("uci should parse");
            perform_move(&mut state, &mv, MoveMode::Commit).expect("move should be legal");
        }
        assert!(state.in_check);
        assert!(!has_any_legal_move(&mut state));
    }
}
