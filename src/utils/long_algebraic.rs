//! UCI-style move strings: `<from><to>[promotion]`, with a board digit in
//! front of each square for multi-board games and `<Piece>@<to>` for drops.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::{algebraic_to_square, square_to_text};

pub fn move_to_long_algebraic(game_state: &GameState, mv: &ChessMove) -> String {
    let geometry = &game_state.geometry;
    let mut out = match mv.from {
        MoveOrigin::Drop(kind) => format!("{}@", kind.letter()),
        MoveOrigin::Square(from) => square_to_text(geometry, from),
    };
    out.push_str(&square_to_text(geometry, mv.to));
    if let Some(kind) = mv.promotion {
        out.push(kind.letter().to_ascii_lowercase());
    }
    out
}

/// Parses a UCI move string. Only the syntax and square existence are
/// checked here; legality is decided by the move engine.
pub fn parse_uci_move(game_state: &GameState, text: &str) -> ChessResult<ChessMove> {
    let invalid = || ChessErrors::InvalidMoveString(text.to_owned());
    let geometry = &game_state.geometry;
    let text = text.trim();

    if let Some((piece, to)) = text.split_once('@') {
        let mut letters = piece.chars();
        let kind = letters
            .next()
            .and_then(PieceKind::from_letter)
            .ok_or_else(invalid)?;
        if letters.next().is_some() {
            return Err(invalid());
        }
        let to = algebraic_to_square(geometry, to).map_err(|_| invalid())?;
        return Ok(ChessMove::drop(kind, to));
    }

    let (squares, promotion) = match text.chars().last() {
        Some(last) if last.is_ascii_alphabetic() => {
            let kind = PieceKind::from_letter(last).ok_or_else(invalid)?;
            (&text[..text.len() - last.len_utf8()], Some(kind))
        }
        _ => (text, None),
    };

    // A rank may have two digits and the next square may start with a board
    // digit, so try every split and keep the first that names two squares.
    for split in 2..squares.len() {
        if !squares.is_char_boundary(split) {
            continue;
        }
        let (from_text, to_text) = squares.split_at(split);
        if let (Ok(from), Ok(to)) = (
            algebraic_to_square(geometry, from_text),
            algebraic_to_square(geometry, to_text),
        ) {
            return Ok(ChessMove { from: MoveOrigin::Square(from), to, promotion });
        }
    }
    Err(invalid())
}

#[cfg(test)]
mod tests {
    use super::{move_to_long_algebraic, parse_uci_move};
    use crate::game_state::chess_rules::{HEXAGONAL_STARTING_POSITION_FEN, STARTING_POSITION_FEN};
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};

    #[test]
    fn orthodox_moves_and_promotions() {
        let state = GameState::from_fen(VariantSet::empty(), STARTING_POSITION_FEN)
            .expect("start position should parse");
        let mv = parse_uci_move(&state, "e2e4").expect("e2e4 parses");
        assert_eq!(mv, ChessMove::new(Square::new(0, 4, 1), Square::new(0, 4, 3)));
        let promotion = parse_uci_move(&state, "a7a8q").expect("promotion parses");
        assert_eq!(promotion.promotion, Some(PieceKind::Queen));
        assert_eq!(move_to_long_algebraic(&state, &promotion), "a7a8q");
        assert!(parse_uci_move(&state, "e2").is_err());
        assert!(parse_uci_move(&state, "e2e9").is_err());
    }

    #[test]
    fn drops_use_at_sign() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Crazyhouse]),
            "4k3/8/8/8/8/8/8/4K3/N w - - 0 1",
        )
        .expect("crazyhouse position should parse");
        let mv = parse_uci_move(&state, "N@e4").expect("drop parses");
        assert_eq!(mv, ChessMove::drop(PieceKind::Knight, Square::new(0, 4, 3)));
        assert_eq!(move_to_long_algebraic(&state, &mv), "N@e4");
    }

    #[test]
    fn board_prefixes_and_two_digit_ranks() {
        let alice = GameState::from_fen(
            VariantSet::of(&[Variant::AliceChess]),
            "4k3/8/8/8/8/8/8/R3K3 8/8/8/8/8/8/8/8 w Q - 0 1",
        )
        .expect("alice position should parse");
        let mv = parse_uci_move(&alice, "0a10a5").expect("board prefixed move parses");
        assert_eq!(mv, ChessMove::new(Square::new(0, 0, 0), Square::new(0, 0, 4)));
        assert_eq!(move_to_long_algebraic(&alice, &mv), "0a10a5");

        let hex = GameState::from_fen(VariantSet::of(&[Variant::Hexagonal]), HEXAGONAL_STARTING_POSITION_FEN)
            .expect("hex start should parse");
        let mv = parse_uci_move(&hex, "f10f9").expect("two digit rank parses");
        assert_eq!(mv, ChessMove::new(Square::new(0, 5, 9), Square::new(0, 5, 8)));
    }
}
