use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::{possible_moves, SquareMode};

/// `color`'s royal pieces on the board. Empty in Antichess, where kings are
/// ordinary pieces.
pub fn royal_pieces(game_state: &GameState, color: Color) -> Vec<PieceIndex> {
    if !game_state.rules.royal_kings {
        return Vec::new();
    }
    game_state
        .pieces_on_board(color)
        .filter(|idx| game_state.pieces[*idx].is_royal())
        .collect()
}

/// Does any `attacker_color` piece attack `square` on its board?
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    game_state
        .pieces_on_board(attacker_color)
        .filter(|idx| {
            game_state.pieces[*idx]
                .square()
                .is_some_and(|from| from.board == square.board)
        })
        .any(|idx| possible_moves(game_state, idx, SquareMode::Attacked).contains(&square))
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    royal_pieces(game_state, color).into_iter().any(|idx| {
        game_state.pieces[idx]
            .square()
            .is_some_and(|square| is_square_attacked(game_state, square, color.opposite()))
    })
}

/// `piece` is controlled by another piece of its own colour (Patrol).
pub fn is_patrolled(game_state: &GameState, piece: PieceIndex) -> bool {
    let Some(square) = game_state.pieces[piece].square() else {
        return false;
    };
    let color = game_state.pieces[piece].color;
    game_state
        .pieces_on_board(color)
        .filter(|idx| *idx != piece)
        .any(|idx| possible_moves(game_state, idx, SquareMode::Controlled).contains(&square))
}

/// `piece` is observed by an enemy piece of the same kind (Madrasi).
pub fn is_paralyzed(game_state: &GameState, piece: PieceIndex) -> bool {
    let target = &game_state.pieces[piece];
    let Some(square) = target.square() else {
        return false;
    };
    game_state
        .pieces_on_board(target.color.opposite())
        .filter(|idx| game_state.pieces[*idx].kind == target.kind)
        .any(|idx| possible_moves(game_state, idx, SquareMode::Controlled).contains(&square))
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked, royal_pieces};
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};

    #[test]
    fn detects_check_from_slider() {
        let state = GameState::from_fen(VariantSet::empty(), "4k3/8/8/8/8/8/8/R3K3 b - - 0 1")
            .expect("position should parse");
        assert!(!is_king_in_check(&state, Color::Dark));
        assert!(is_square_attacked(&state, Square::new(0, 0, 7), Color::Light));
        assert!(!is_square_attacked(&state, Square::new(0, 1, 7), Color::Light));
    }

    #[test]
    fn royal_compound_pieces_count_as_kings() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Frankfurt]),
            "4k3/8/8/8/8/8/8/4R!3 w - - 0 1",
        )
        .expect("royal rook should parse");
        assert_eq!(royal_pieces(&state, Color::Light).len(), 1);
    }

    #[test]
    fn antichess_has_no_royal_pieces() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Antichess]),
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        )
        .expect("position should parse");
        assert!(royal_pieces(&state, Color::Light).is_empty());
    }
}
