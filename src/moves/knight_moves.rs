use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::leap_targets;
use crate::move_generation::move_generator::SquareMode;

pub fn knight_targets(state: &GameState, from: Square, color: Color, mode: SquareMode, out: &mut Vec<Square>) {
    leap_targets(state, from, color, state.geometry.knight_steps(), mode, out);
}

#[cfg(test)]
mod tests {
    use super::knight_targets;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::move_generator::SquareMode;

    #[test]
    fn knight_from_d4_has_eight_targets() {
        let state = GameState::from_fen(VariantSet::empty(), "k7/8/8/8/3N4/8/8/7K w - - 0 1")
            .expect("position should parse");
        let mut out = Vec::new();
        knight_targets(&state, Square::new(0, 3, 3), Color::Light, SquareMode::ForActualMove, &mut out);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn circular_knight_crosses_the_sector_seam() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::CircularChess]),
            "k7/8/8/8/8/8/8/N6K w - - 0 1",
        )
        .expect("position should parse");
        let mut out = Vec::new();
        knight_targets(&state, Square::new(0, 0, 0), Color::Light, SquareMode::Possible, &mut out);
        // Sector -2 wraps to 14, which is g2 on the folded array.
        assert!(out.contains(&Square::new(0, 6, 1)));
        assert!(out.contains(&Square::new(0, 1, 2)));
    }
}
