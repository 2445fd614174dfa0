use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::slide_targets;
use crate::move_generation::move_generator::SquareMode;

/// Diagonal slides. Bishops keep their square colour on every board shape.
pub fn bishop_targets(state: &GameState, from: Square, color: Color, mode: SquareMode, out: &mut Vec<Square>) {
    slide_targets(state, from, color, state.geometry.bishop_steps(), mode, out);
}

#[cfg(test)]
mod tests {
    use super::bishop_targets;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::move_generator::SquareMode;

    #[test]
    fn bishop_stops_on_first_blocker_when_attacking() {
        let state = GameState::from_fen(VariantSet::empty(), "k7/8/8/8/8/2p5/8/K3B3 w - - 0 1")
            .expect("position should parse");
        let mut out = Vec::new();
        bishop_targets(&state, Square::new(0, 4, 0), Color::Light, SquareMode::Attacked, &mut out);
        // d2, c3 (blocker) and f2, g3, h4.
        assert_eq!(out.len(), 5);
        assert!(out.contains(&Square::new(0, 2, 2)));
        assert!(!out.contains(&Square::new(0, 1, 3)));
    }

    #[test]
    fn cylinder_bishop_wraps_around_the_edge() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Cylinder]),
            "7k/8/8/8/8/8/8/K6B w - - 0 1",
        )
        .expect("position should parse");
        let mut out = Vec::new();
        bishop_targets(&state, Square::new(0, 7, 0), Color::Light, SquareMode::ForActualMove, &mut out);
        // h1-a2 wraps, so both diagonals run up the board and cross on d5.
        assert!(out.contains(&Square::new(0, 0, 1)));
        assert!(out.contains(&Square::new(0, 6, 1)));
        out.sort_unstable();
        out.dedup();
        assert_eq!(out.len(), 13);
    }

    #[test]
    fn hexagonal_bishop_keeps_its_colour() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Hexagonal]),
            "1/3/5/7/9/5B5/k10/11/11/11/K10 w - - 0 1",
        )
        .expect("hex position should parse");
        let from = Square::new(0, 5, 5);
        let mut out = Vec::new();
        bishop_targets(&state, from, Color::Light, SquareMode::Possible, &mut out);
        let colour = state.geometry.square_color(from);
        assert!(out.iter().all(|square| state.geometry.square_color(*square) == colour));
        assert_eq!(out.len(), 12);
    }
}
