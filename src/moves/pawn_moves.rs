//! Pawn pushes, captures, en passant and Retreat Chess back steps.

use crate::game_state::board_geometry::Step;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{occupant, Occupant};
use crate::move_generation::move_generator::SquareMode;

/// May the pawn on `from` advance two steps?
fn double_step_allowed(state: &GameState, from: Square, color: Color) -> bool {
    if !state.rules.pawn_double_step {
        return false;
    }
    state.geometry.is_pawn_start(from, color)
        || (state.rules.horde && color == Color::Light && from.rank == 0)
}

fn backward(step: Step) -> Step {
    Step {
        dx: -step.dx,
        dy: -step.dy,
    }
}

pub fn pawn_targets(state: &GameState, from: Square, color: Color, mode: SquareMode, out: &mut Vec<Square>) {
    let geometry = &state.geometry;
    let forward = geometry.pawn_forward(from, color);

    let captures = geometry
        .pawn_captures(from, color)
        .into_iter()
        .filter_map(|step| geometry.square_in_direction(from, step))
        .filter(|square| *square != from);

    match mode {
        SquareMode::Attacked | SquareMode::Controlled => {
            out.extend(captures);
            return;
        }
        SquareMode::Possible | SquareMode::Premove => {
            out.extend(captures);
            if let Some(one) = geometry.square_in_direction(from, forward) {
                out.push(one);
                if double_step_allowed(state, from, color) {
                    out.extend(geometry.square_in_direction(one, forward));
                }
            }
            if state.rules.retreating_pawns {
                out.extend(
                    geometry
                        .square_in_direction(from, backward(forward))
                        .filter(|square| !geometry.is_first_rank(*square, color)),
                );
            }
            return;
        }
        SquareMode::ForActualMove | SquareMode::Visible => {}
    }

    let visible = mode == SquareMode::Visible;

    // Pushes. Vision includes the blocking piece.
    if let Some(one) = geometry.square_in_direction(from, forward) {
        match occupant(state, one, color) {
            Occupant::Empty => {
                out.push(one);
                if double_step_allowed(state, from, color) {
                    if let Some(two) = geometry.square_in_direction(one, forward) {
                        match occupant(state, two, color) {
                            Occupant::Empty => out.push(two),
                            _ if visible => out.push(two),
                            _ => {}
                        }
                    }
                }
            }
            _ if visible => out.push(one),
            _ => {}
        }
    }

    for square in captures {
        let en_passant = state
            .en_passant
            .is_some_and(|ep| ep.target == square && state.pieces[ep.pawn].color != color);
        if occupant(state, square, color) == Occupant::Enemy || en_passant {
            out.push(square);
        }
    }

    if state.rules.retreating_pawns && !visible {
        if let Some(back) = geometry.square_in_direction(from, backward(forward)) {
            if occupant(state, back, color) == Occupant::Empty && !geometry.is_first_rank(back, color) {
                out.push(back);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pawn_targets;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::move_generator::SquareMode;

    fn targets(variants: &[Variant], fen: &str, from: Square) -> Vec<Square> {
        let state = GameState::from_fen(VariantSet::of(variants), fen).expect("position should parse");
        let color = state.pieces[state.piece_at(from).expect("pawn on square")].color;
        let mut out = Vec::new();
        pawn_targets(&state, from, color, SquareMode::ForActualMove, &mut out);
        out.sort_unstable();
        out
    }

    #[test]
    fn start_pawn_single_and_double_push() {
        let out = targets(&[], "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Square::new(0, 4, 1));
        assert_eq!(out, vec![Square::new(0, 4, 2), Square::new(0, 4, 3)]);
    }

    #[test]
    fn en_passant_target_is_offered() {
        let out = targets(&[], "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", Square::new(0, 4, 4));
        assert_eq!(out, vec![Square::new(0, 3, 5), Square::new(0, 4, 5)]);
    }

    #[test]
    fn retreat_chess_pawn_steps_back_but_not_to_first_rank() {
        let out = targets(&[Variant::RetreatChess], "4k3/8/8/8/4P3/8/8/4K3 w - - 0 1", Square::new(0, 4, 3));
        assert_eq!(out, vec![Square::new(0, 4, 2), Square::new(0, 4, 4)]);
        let low = targets(&[Variant::RetreatChess], "4k3/8/8/8/8/8/3P4/4K3 w - - 0 1", Square::new(0, 3, 1));
        assert!(!low.contains(&Square::new(0, 3, 0)));
    }

    #[test]
    fn horde_pawns_double_step_from_first_rank() {
        let out = targets(
            &[Variant::Horde],
            "4k3/8/8/8/8/8/8/P7 w - - 0 1",
            Square::new(0, 0, 0),
        );
        assert_eq!(out, vec![Square::new(0, 0, 1), Square::new(0, 0, 2)]);
    }

    #[test]
    fn circular_pawns_never_double_step() {
        let out = targets(
            &[Variant::CircularChess],
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            Square::new(0, 4, 1),
        );
        assert_eq!(out, vec![Square::new(0, 4, 2)]);
    }
}
