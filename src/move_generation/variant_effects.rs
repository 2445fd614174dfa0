//! Capture-time transformations that change what a piece is: Absorption,
//! Frankfurt and Circe rebirth squares. Atomic, Benedict and Alice effects
//! relocate pieces and live next to `perform_move`.

use crate::game_state::chess_types::*;

/// Movement of a piece without its king component.
fn non_royal_movement(piece: &Piece) -> Movement {
    Movement {
        king: false,
        ..piece.kind.movement()
    }
}

/// Absorption: the capturer gains every power the captured piece had.
pub fn absorb(state: &mut GameState, undo: &mut UndoState, capturer: PieceIndex, captured: PieceIndex) {
    let victim = &state.pieces[captured];
    let attacker = &state.pieces[capturer];
    if victim.kind == PieceKind::Pawn || attacker.kind == PieceKind::Pawn {
        return;
    }
    let merged = non_royal_movement(attacker).union(non_royal_movement(victim));
    let Some(kind) = PieceKind::from_movement(merged) else {
        return;
    };
    let royal = attacker.is_royal();
    undo.touch(state, capturer);
    let piece = &mut state.pieces[capturer];
    piece.kind = kind;
    piece.abilities = royal.then_some(PieceKind::King);
}

/// Frankfurt: the capturer turns into the captured kind. Royal capturers
/// stay royal and ignore pawns; a pawn capture that lands a pawn on its
/// promotion square leaves the capturer as it is.
pub fn frankfurt_transform(
    state: &mut GameState,
    undo: &mut UndoState,
    capturer: PieceIndex,
    captured: PieceIndex,
    landing: Square,
) {
    let victim_kind = state.pieces[captured].kind;
    if victim_kind == PieceKind::King {
        return;
    }
    let attacker = &state.pieces[capturer];
    let royal = attacker.is_royal();
    if royal && victim_kind == PieceKind::Pawn {
        return;
    }
    if !royal
        && victim_kind == PieceKind::Pawn
        && state.geometry.is_promotion_square(landing, attacker.color)
    {
        return;
    }
    undo.touch(state, capturer);
    let piece = &mut state.pieces[capturer];
    piece.kind = victim_kind;
    piece.abilities = royal.then_some(PieceKind::King);
}

/// Circe: where the captured piece is reborn, if that cell is free on
/// every board.
pub fn circe_rebirth_square(state: &GameState, captured: PieceIndex, capture_square: Square) -> Option<Square> {
    let victim = &state.pieces[captured];
    let homes: Vec<Square> = state
        .circe_homes
        .iter()
        .filter(|(color, kind, _)| *color == victim.color && *kind == victim.kind)
        .map(|(_, _, square)| *square)
        .collect();

    let home = if victim.kind == PieceKind::Pawn {
        homes
            .into_iter()
            .find(|square| square.file == capture_square.file)
    } else if homes.len() == 1 {
        homes.first().copied()
    } else {
        let shade = state.geometry.square_color(capture_square);
        homes
            .iter()
            .copied()
            .find(|square| state.geometry.square_color(*square) == shade)
            .or_else(|| homes.first().copied())
    }?;

    state.piece_at_loose(home).is_none().then_some(home)
}

/// Total value of `color`'s pieces on the boards.
pub fn material_on_board(state: &GameState, color: Color) -> u32 {
    state
        .pieces_on_board(color)
        .map(|idx| state.pieces[idx].kind.value())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{circe_rebirth_square, material_on_board};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::legal_move_apply::{perform_move, MoveMode};
    use crate::utils::long_algebraic::parse_uci_move;

    fn play(state: &mut GameState, uci: &str) {
        let mv = parse_uci_move(state, uci).expect("uci should parse");
        perform_move(state, &mv, MoveMode::Commit).expect("move should be legal");
    }

    #[test]
    fn absorbing_rook_turns_bishop_into_queen() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::Absorption]),
            "4k3/8/8/3r4/8/1B6/8/4K3 w - - 0 1",
        )
        .expect("position should parse");
        play(&mut state, "b3d5");
        let bishop = state.piece_at(Square::new(0, 3, 4)).expect("capturer on d5");
        assert_eq!(state.pieces[bishop].kind, PieceKind::Queen);
    }

    #[test]
    fn royal_absorber_keeps_king_powers() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::Absorption]),
            "4k3/8/8/8/8/8/3n4/4K3 w - - 0 1",
        )
        .expect("position should parse");
        play(&mut state, "e1d2");
        let king = state.piece_at(Square::new(0, 3, 1)).expect("king on d2");
        assert_eq!(state.pieces[king].kind, PieceKind::Knight);
        assert!(state.pieces[king].is_royal());
        assert_eq!(state.get_fen(), "4k3/8/8/8/8/8/3N!4/8 b - - 0 1");
    }

    #[test]
    fn frankfurt_capturer_takes_the_victims_shape() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::Frankfurt]),
            "4k3/8/8/3r4/8/1B6/8/4K3 w - - 0 1",
        )
        .expect("position should parse");
        play(&mut state, "b3d5");
        let capturer = state.piece_at(Square::new(0, 3, 4)).expect("capturer on d5");
        assert_eq!(state.pieces[capturer].kind, PieceKind::Rook);
    }

    #[test]
    fn circe_bishop_returns_to_home_of_the_capture_square_colour() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::Circe]),
            "4k3/8/8/8/3b4/8/8/3RK3 w - - 0 1",
        )
        .expect("position should parse");
        let bishop = state.piece_at(Square::new(0, 3, 3)).expect("bishop on d4");
        // d4 is a dark square, so the f8 home applies rather than c8.
        assert_eq!(
            circe_rebirth_square(&state, bishop, Square::new(0, 3, 3)),
            Some(Square::new(0, 5, 7))
        );
        play(&mut state, "d1d4");
        assert_eq!(state.piece_at(Square::new(0, 5, 7)), Some(bishop));
    }

    #[test]
    fn start_position_material() {
        let state = GameState::from_fen(VariantSet::empty(), STARTING_POSITION_FEN)
            .expect("start position should parse");
        assert_eq!(material_on_board(&state, Color::Light), 39);
        assert_eq!(material_on_board(&state, Color::Dark), 39);
    }
}
