//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (`e4`, hexagonal `k10`, and
//! board-prefixed `1e4` for multi-board games) and internal squares. Reused
//! by the FEN, PGN, SAN and UCI components.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board_geometry::BoardGeometry;
use crate::game_state::chess_types::Square;

/// File letter plus 1-based rank, without any board prefix (for example: "e4").
#[inline]
pub fn square_to_algebraic(geometry: &BoardGeometry, square: Square) -> String {
    format!("{}{}", geometry.file_letter(square.file), square.rank + 1)
}

/// Full square text: the board index prefixes the coordinate when the game
/// has more than one board.
#[inline]
pub fn square_to_text(geometry: &BoardGeometry, square: Square) -> String {
    if geometry.boards > 1 {
        format!("{}{}", square.board, square_to_algebraic(geometry, square))
    } else {
        square_to_algebraic(geometry, square)
    }
}

/// Parses `e4`, `k10` or `1e4`. Board prefixes are only read on multi-board
/// games; a missing one means board 0.
pub fn algebraic_to_square(geometry: &BoardGeometry, text: &str) -> ChessResult<Square> {
    let invalid = || ChessErrors::InvalidSquare(text.to_owned());
    let mut chars = text.chars().peekable();

    let board = match chars.peek() {
        Some(ch) if ch.is_ascii_digit() && geometry.boards > 1 => {
            let digit = chars.next().and_then(|ch| ch.to_digit(10)).ok_or_else(invalid)?;
            u8::try_from(digit).map_err(|_| invalid())?
        }
        _ => 0,
    };
    let file = chars
        .next()
        .and_then(|letter| geometry.file_from_letter(letter))
        .ok_or_else(invalid)?;
    let rank_text: String = chars.collect();
    if rank_text.is_empty() || !rank_text.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid());
    }
    let rank: u8 = rank_text.parse().map_err(|_| invalid())?;
    if rank == 0 {
        return Err(invalid());
    }

    let square = Square::new(board, file, rank - 1);
    if !geometry.contains(square) {
        return Err(invalid());
    }
    Ok(square)
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_text};
    use crate::game_state::board_geometry::BoardGeometry;
    use crate::game_state::chess_types::Square;
    use crate::game_state::variants::{Variant, VariantSet};

    #[test]
    fn orthodox_round_trip() {
        let geometry = BoardGeometry::from_variants(VariantSet::empty());
        let square = algebraic_to_square(&geometry, "e4").expect("e4 is a square");
        assert_eq!(square, Square::new(0, 4, 3));
        assert_eq!(square_to_text(&geometry, square), "e4");
        assert!(algebraic_to_square(&geometry, "i1").is_err());
        assert!(algebraic_to_square(&geometry, "a9").is_err());
        assert!(algebraic_to_square(&geometry, "a0").is_err());
    }

    #[test]
    fn alice_squares_carry_the_board() {
        let geometry = BoardGeometry::from_variants(VariantSet::of(&[Variant::AliceChess]));
        let square = algebraic_to_square(&geometry, "1d5").expect("board 1 square");
        assert_eq!(square, Square::new(1, 3, 4));
        assert_eq!(square_to_text(&geometry, square), "1d5");
        assert_eq!(
            algebraic_to_square(&geometry, "d5").expect("board 0 default"),
            Square::new(0, 3, 4)
        );
    }

    #[test]
    fn hexagonal_files_skip_j_and_vary_in_length() {
        let geometry = BoardGeometry::from_variants(VariantSet::of(&[Variant::Hexagonal]));
        assert_eq!(
            algebraic_to_square(&geometry, "f11").expect("top of the centre file"),
            Square::new(0, 5, 10)
        );
        assert_eq!(
            algebraic_to_square(&geometry, "l6").expect("top of the last file"),
            Square::new(0, 10, 5)
        );
        assert!(algebraic_to_square(&geometry, "l7").is_err());
        assert!(algebraic_to_square(&geometry, "j1").is_err());
    }
}
