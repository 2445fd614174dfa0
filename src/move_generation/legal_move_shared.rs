//! Ray and leaper walkers shared by the per-piece generators.

use crate::game_state::board_geometry::Step;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::SquareMode;

/// What stands on a square relative to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Own,
    Enemy,
}

#[inline]
pub fn occupant(state: &GameState, square: Square, color: Color) -> Occupant {
    match state.piece_at(square) {
        None => Occupant::Empty,
        Some(idx) if state.pieces[idx].color == color => Occupant::Own,
        Some(_) => Occupant::Enemy,
    }
}

/// Sliding targets along each step direction.
pub fn slide_targets(
    state: &GameState,
    from: Square,
    color: Color,
    steps: &[Step],
    mode: SquareMode,
    out: &mut Vec<Square>,
) {
    for step in steps {
        for square in state.geometry.traverse(from, *step) {
            match (mode, occupant(state, square, color)) {
                (SquareMode::Possible | SquareMode::Premove, _) => out.push(square),
                (_, Occupant::Empty) => out.push(square),
                (SquareMode::ForActualMove, Occupant::Own) => break,
                (SquareMode::ForActualMove, Occupant::Enemy) => {
                    out.push(square);
                    break;
                }
                // Attack, control and vision include the first blocker.
                (_, _) => {
                    out.push(square);
                    break;
                }
            }
        }
    }
}

/// Single-step targets for each step (knight leaps, king steps).
pub fn leap_targets(
    state: &GameState,
    from: Square,
    color: Color,
    steps: &[Step],
    mode: SquareMode,
    out: &mut Vec<Square>,
) {
    for step in steps {
        let Some(square) = state.geometry.square_in_direction(from, *step) else {
            continue;
        };
        if square == from {
            continue;
        }
        if mode == SquareMode::ForActualMove && occupant(state, square, color) == Occupant::Own {
            continue;
        }
        out.push(square);
    }
}
