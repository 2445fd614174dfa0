use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::slide_targets;
use crate::move_generation::move_generator::SquareMode;

/// Orthogonal slides (hex: the six edge-adjacent directions).
pub fn rook_targets(state: &GameState, from: Square, color: Color, mode: SquareMode, out: &mut Vec<Square>) {
    slide_targets(state, from, color, state.geometry.rook_steps(), mode, out);
}
