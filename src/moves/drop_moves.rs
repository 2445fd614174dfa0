//! Crazyhouse pocket drops.

use crate::game_state::chess_rules::POCKET_ORDER;
use crate::game_state::chess_types::*;

/// Distinct kinds in `color`'s pocket, in pocket order.
pub fn pocket_kinds(state: &GameState, color: Color) -> Vec<PieceKind> {
    let mut kinds: Vec<PieceKind> = state
        .pocket(color)
        .map(|idx| state.pieces[idx].kind)
        .collect();
    kinds.sort_by_key(|kind| {
        POCKET_ORDER
            .iter()
            .position(|ordered| ordered == kind)
            .unwrap_or(POCKET_ORDER.len() + kind.index())
    });
    kinds.dedup();
    kinds
}

/// Pseudo-legal drops for the side to move: any empty square, pawns never
/// on a first or last rank.
pub fn generate_drop_moves(state: &GameState, color: Color, out: &mut Vec<ChessMove>) {
    if !state.rules.uses_pockets {
        return;
    }
    let kinds = pocket_kinds(state, color);
    if kinds.is_empty() {
        return;
    }
    let geometry = state.geometry;
    for square in geometry.squares() {
        if state.piece_at(square).is_some() {
            continue;
        }
        for kind in &kinds {
            if *kind == PieceKind::Pawn
                && Color::ALL
                    .into_iter()
                    .any(|side| geometry.is_promotion_square(square, side))
            {
                continue;
            }
            out.push(ChessMove::drop(*kind, square));
        }
    }
}
