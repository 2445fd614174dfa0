//! King steps and castling candidates.

use crate::game_state::castling::{castling_path_is_clear, castling_plan, castling_target, CastlingPlan};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::leap_targets;
use crate::move_generation::move_generator::SquareMode;

pub fn king_targets(state: &GameState, from: Square, color: Color, mode: SquareMode, out: &mut Vec<Square>) {
    leap_targets(state, from, color, state.geometry.king_steps(), mode, out);
}

/// Castling move targets for `king`. Real moves require a clear path and,
/// unless the variant waives check, an unattacked king walk.
pub fn castling_targets(state: &GameState, king: PieceIndex, mode: SquareMode, out: &mut Vec<Square>) {
    let color = state.pieces[king].color;
    for side in CastlingSide::ALL {
        let Some(plan) = castling_plan(state, color, side) else {
            continue;
        };
        if plan.king != king {
            continue;
        }
        let offered = match mode {
            SquareMode::Premove => true,
            SquareMode::ForActualMove => castling_is_playable(state, &plan, color),
            _ => false,
        };
        if offered {
            out.push(castling_target(state, &plan));
        }
    }
}

fn castling_is_playable(state: &GameState, plan: &CastlingPlan, color: Color) -> bool {
    if !castling_path_is_clear(state, plan) {
        return false;
    }
    if state.rules.alice {
        // The king passes to the other board and must land on an empty cell.
        let next = state.geometry.next_board(plan.king_to.board);
        if state.piece_at(plan.king_to.on_board(next)).is_some() {
            return false;
        }
    }
    if state.rules.tracks_check() && !state.rules.leave_in_check_allowed {
        let opponent = color.opposite();
        let low = plan.king_from.file.min(plan.king_to.file);
        let high = plan.king_from.file.max(plan.king_to.file);
        let walk_attacked = (low..=high).any(|file| {
            let square = Square::new(plan.king_from.board, file, plan.king_from.rank);
            is_square_attacked(state, square, opponent)
        });
        if walk_attacked {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::castling_targets;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::VariantSet;
    use crate::move_generation::move_generator::SquareMode;

    fn castles(fen: &str) -> Vec<Square> {
        let state = GameState::from_fen(VariantSet::empty(), fen).expect("position should parse");
        let king = state.piece_at(Square::new(0, 4, 0)).expect("white king on e1");
        let mut out = Vec::new();
        castling_targets(&state, king, SquareMode::ForActualMove, &mut out);
        out
    }

    #[test]
    fn both_sides_available_on_clear_back_rank() {
        let out = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(out, vec![Square::new(0, 2, 0), Square::new(0, 6, 0)]);
    }

    #[test]
    fn attacked_transit_square_blocks_castling() {
        // Black rook on f8 covers f1.
        let out = castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(out, vec![Square::new(0, 2, 0)]);
    }

    #[test]
    fn queen_side_b_file_may_be_attacked() {
        let out = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(out, vec![Square::new(0, 2, 0)]);
    }
}
