//! Standard algebraic notation (SAN) and its figurine form.
//!
//! Writing needs the list of legal moves of the position so the moving
//! piece can be disambiguated; reading matches a SAN token structurally
//! against the legal moves, which also makes it tolerant of redundant
//! disambiguators and missing capture marks.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::castling::castling_side_for_move;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::is_capture;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Same destination cell, ignoring the board when there are several.
fn same_target(game_state: &GameState, a: Square, b: Square) -> bool {
    if game_state.geometry.boards > 1 {
        a.loose_eq(&b)
    } else {
        a == b
    }
}

fn mover_kind(game_state: &GameState, mv: &ChessMove) -> Option<PieceKind> {
    match mv.from {
        MoveOrigin::Drop(kind) => Some(kind),
        MoveOrigin::Square(from) => game_state.piece_at(from).map(|idx| game_state.pieces[idx].kind),
    }
}

/// SAN of `mv` without the check or mate suffix. `legal` must be the legal
/// moves of the current position.
pub fn move_to_san(game_state: &GameState, mv: &ChessMove, legal: &[ChessMove]) -> String {
    let geometry = &game_state.geometry;
    let from = match mv.from {
        MoveOrigin::Drop(kind) => {
            return format!("{}@{}", kind.letter(), square_to_algebraic(geometry, mv.to));
        }
        MoveOrigin::Square(from) => from,
    };
    if let Some(plan) = castling_side_for_move(game_state, mv) {
        return match plan.side {
            CastlingSide::KingSide => "O-O".to_owned(),
            CastlingSide::QueenSide => "O-O-O".to_owned(),
        };
    }

    let kind = mover_kind(game_state, mv).unwrap_or(PieceKind::Pawn);
    let capture = is_capture(game_state, mv);
    let mut out = String::new();

    if kind == PieceKind::Pawn {
        // Pawns of other boards can reach the same cell; the board digit
        // tells them apart.
        let clash = geometry.boards > 1
            && legal.iter().any(|other| {
                other.from_square().is_some_and(|other_from| {
                    other_from.board != from.board
                        && same_target(game_state, other.to, mv.to)
                        && mover_kind(game_state, other) == Some(PieceKind::Pawn)
                        && other.promotion == mv.promotion
                        && (!capture || other_from.file == from.file)
                })
            });
        if clash {
            out.push_str(&from.board.to_string());
        }
        if capture {
            out.push(geometry.file_letter(from.file));
        }
    } else {
        out.push(kind.letter());
        let rivals: Vec<Square> = legal
            .iter()
            .filter(|other| {
                other.from != mv.from
                    && same_target(game_state, other.to, mv.to)
                    && mover_kind(game_state, other) == Some(kind)
                    && castling_side_for_move(game_state, other).is_none()
            })
            .filter_map(|other| other.from_square())
            .collect();
        out.push_str(&disambiguator(game_state, from, &rivals));
    }

    if capture {
        out.push('x');
    }
    out.push_str(&square_to_algebraic(geometry, mv.to));
    if let Some(promotion) = mv.promotion {
        out.push('=');
        out.push(promotion.letter());
    }
    out
}

/// Shortest prefix telling `from` apart from every rival origin, trying
/// board, file, rank, board+file, board+rank, file+rank, then all three.
fn disambiguator(game_state: &GameState, from: Square, rivals: &[Square]) -> String {
    if rivals.is_empty() {
        return String::new();
    }
    let geometry = &game_state.geometry;
    let multi_board = geometry.boards > 1;
    let board = from.board.to_string();
    let file = geometry.file_letter(from.file).to_string();
    let rank = (from.rank + 1).to_string();

    // (uses board, uses file, uses rank)
    let options = [
        (true, false, false),
        (false, true, false),
        (false, false, true),
        (true, true, false),
        (true, false, true),
        (false, true, true),
    ];
    for (by_board, by_file, by_rank) in options {
        if by_board && !multi_board {
            continue;
        }
        let unique = rivals.iter().all(|rival| {
            (by_board && rival.board != from.board)
                || (by_file && rival.file != from.file)
                || (by_rank && rival.rank != from.rank)
        });
        if unique {
            let mut text = String::new();
            if by_board {
                text.push_str(&board);
            }
            if by_file {
                text.push_str(&file);
            }
            if by_rank {
                text.push_str(&rank);
            }
            return text;
        }
    }
    if multi_board {
        format!("{board}{file}{rank}")
    } else {
        format!("{file}{rank}")
    }
}

/// Figurine form of a SAN string for `color`'s move.
pub fn san_to_figurine(san: &str, color: Color) -> String {
    san.chars()
        .map(|ch| match (ch, color) {
            ('K', Color::Light) => '♔',
            ('Q', Color::Light) => '♕',
            ('R', Color::Light) => '♖',
            ('B', Color::Light) => '♗',
            ('N', Color::Light) => '♘',
            ('P', Color::Light) => '♙',
            ('K', Color::Dark) => '♚',
            ('Q', Color::Dark) => '♛',
            ('R', Color::Dark) => '♜',
            ('B', Color::Dark) => '♝',
            ('N', Color::Dark) => '♞',
            ('P', Color::Dark) => '♟',
            (other, _) => other,
        })
        .collect()
}

/// Disambiguation written in a SAN token.
#[derive(Debug, Default)]
struct Disambiguation {
    board: Option<u8>,
    file: Option<u8>,
    rank: Option<u8>,
    /// Bare digits with no file letter: a rank, or a board on multi-board games.
    bare_number: Option<u8>,
}

fn parse_disambiguation(game_state: &GameState, text: &str, token: &str) -> ChessResult<Disambiguation> {
    let invalid = || ChessErrors::InvalidMoveString(token.to_owned());
    let mut result = Disambiguation::default();
    if text.is_empty() {
        return Ok(result);
    }
    match text.find(|ch: char| ch.is_ascii_alphabetic()) {
        Some(letter_at) => {
            let (before, rest) = text.split_at(letter_at);
            let mut rest = rest.chars();
            let letter = rest.next().ok_or_else(invalid)?;
            result.file = Some(game_state.geometry.file_from_letter(letter).ok_or_else(invalid)?);
            if !before.is_empty() {
                result.board = Some(before.parse().map_err(|_| invalid())?);
            }
            let after: String = rest.collect();
            if !after.is_empty() {
                let rank: u8 = after.parse().map_err(|_| invalid())?;
                result.rank = Some(rank.checked_sub(1).ok_or_else(invalid)?);
            }
        }
        None => result.bare_number = Some(text.parse().map_err(|_| invalid())?),
    }
    Ok(result)
}

impl Disambiguation {
    fn accepts(&self, from: Square, multi_board: bool) -> bool {
        let bare_ok = match self.bare_number {
            None => true,
            Some(number) => {
                number.checked_sub(1) == Some(from.rank) || (multi_board && number == from.board)
            }
        };
        bare_ok
            && self.board.map_or(true, |board| board == from.board)
            && self.file.map_or(true, |file| file == from.file)
            && self.rank.map_or(true, |rank| rank == from.rank)
    }
}

/// Finds the legal move a SAN token refers to.
pub fn parse_san_move(game_state: &mut GameState, token: &str) -> ChessResult<ChessMove> {
    let legal = legal_moves(game_state);
    let trimmed = token.trim().trim_end_matches(['+', '#', '!', '?']);
    let castling = trimmed.replace('0', "O");
    let cleaned: String = trimmed.chars().filter(|ch| *ch != 'x' && *ch != ':').collect();

    let matches: Vec<ChessMove> = if castling == "O-O" || castling == "O-O-O" {
        let side = if castling == "O-O" {
            CastlingSide::KingSide
        } else {
            CastlingSide::QueenSide
        };
        legal
            .iter()
            .copied()
            .filter(|mv| castling_side_for_move(game_state, mv).is_some_and(|plan| plan.side == side))
            .collect()
    } else if let Some((piece, to)) = cleaned.split_once('@') {
        let kind = piece
            .chars()
            .next()
            .and_then(PieceKind::from_letter)
            .ok_or_else(|| ChessErrors::InvalidMoveString(token.to_owned()))?;
        let to = algebraic_to_square(&game_state.geometry, to)
            .map_err(|_| ChessErrors::InvalidMoveString(token.to_owned()))?;
        legal
            .iter()
            .copied()
            .filter(|mv| mv.from == MoveOrigin::Drop(kind) && mv.to == to)
            .collect()
    } else {
        match_piece_move(game_state, &legal, &cleaned, token)?
    };

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(ChessErrors::PgnMoveNotFound(token.to_owned())),
        _ => Err(ChessErrors::PgnMoveAmbiguous(token.to_owned())),
    }
}

fn match_piece_move(
    game_state: &GameState,
    legal: &[ChessMove],
    cleaned: &str,
    token: &str,
) -> ChessResult<Vec<ChessMove>> {
    let invalid = || ChessErrors::InvalidMoveString(token.to_owned());

    let (body, promotion) = match cleaned.split_once('=') {
        Some((body, promo)) => {
            let kind = promo.chars().next().and_then(PieceKind::from_letter).ok_or_else(invalid)?;
            (body, Some(kind))
        }
        None => match cleaned.chars().last() {
            Some(last) if last.is_ascii_uppercase() && cleaned.len() > 1 => {
                let kind = PieceKind::from_letter(last).ok_or_else(invalid)?;
                (&cleaned[..cleaned.len() - 1], Some(kind))
            }
            _ => (cleaned, None),
        },
    };

    let (kind, rest) = match body.chars().next() {
        Some(first) if first.is_ascii_uppercase() => {
            (PieceKind::from_letter(first).ok_or_else(invalid)?, &body[1..])
        }
        _ => (PieceKind::Pawn, body),
    };

    // Destination: the trailing letter + digits.
    let digits_at = rest
        .rfind(|ch: char| !ch.is_ascii_digit())
        .ok_or_else(invalid)?;
    let dest_text = &rest[digits_at..];
    let disambiguation_text = &rest[..digits_at];
    let dest = algebraic_to_square(&game_state.geometry, dest_text).map_err(|_| invalid())?;
    let mut disambiguation = parse_disambiguation(game_state, disambiguation_text, token)?;
    let multi_board = game_state.geometry.boards > 1;
    if kind == PieceKind::Pawn && multi_board && disambiguation.board.is_none() {
        // A bare number in front of a pawn move is always its board.
        disambiguation.board = disambiguation.bare_number.take();
    }

    Ok(legal
        .iter()
        .copied()
        .filter(|mv| {
            let Some(from) = mv.from_square() else {
                return false;
            };
            mover_kind(game_state, mv) == Some(kind)
                && same_target(game_state, mv.to, dest)
                && mv.promotion == promotion
                && disambiguation.accepts(from, multi_board)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{move_to_san, parse_san_move, san_to_figurine};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::legal_move_generator::legal_moves;
    use crate::utils::long_algebraic::parse_uci_move;

    fn san_of(variants: &[Variant], fen: &str, uci: &str) -> String {
        let mut state = GameState::from_fen(VariantSet::of(variants), fen).expect("position should parse");
        let legal = legal_moves(&mut state);
        let mv = parse_uci_move(&state, uci).expect("uci should parse");
        move_to_san(&state, &mv, &legal)
    }

    #[test]
    fn file_then_rank_disambiguation() {
        let fen = "4k3/8/8/8/8/1N3N2/8/1N2K3 w - - 0 1";
        assert_eq!(san_of(&[], fen, "b3d4"), "Nbd4");
        assert_eq!(san_of(&[], fen, "b1d2"), "N1d2");
        assert_eq!(san_of(&[], fen, "f3d2"), "Nfd2");
    }

    #[test]
    fn pawn_captures_castling_promotion_and_drops() {
        assert_eq!(san_of(&[], "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"), "exd5");
        assert_eq!(san_of(&[], "4k3/8/8/8/8/8/8/4K2R w K - 0 1", "e1g1"), "O-O");
        assert_eq!(san_of(&[], "k7/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7e8n"), "e8=N");
        assert_eq!(
            san_of(&[Variant::Crazyhouse], "4k3/8/8/8/8/8/8/4K3/N w - - 0 1", "N@e4"),
            "N@e4"
        );
    }

    #[test]
    fn board_is_the_first_disambiguator_in_alice() {
        let fen = "4k3/8/8/8/8/8/8/R3K3 8/8/8/8/8/8/8/7R w - - 0 1";
        assert_eq!(san_of(&[Variant::AliceChess], fen, "0a10d1"), "R0d1");
    }

    #[test]
    fn alice_pawns_reaching_the_same_cell_carry_their_board() {
        let fen = "4k3/8/8/8/8/4P3/8/K7 8/8/8/8/8/8/4P3/8 w - - 0 1";
        let mut state =
            GameState::from_fen(VariantSet::of(&[Variant::AliceChess]), fen).expect("position should parse");
        let legal = legal_moves(&mut state);
        for (uci, san) in [("0e30e4", "0e4"), ("1e21e4", "1e4")] {
            let mv = parse_uci_move(&state, uci).expect("uci should parse");
            assert_eq!(move_to_san(&state, &mv, &legal), san);
            assert_eq!(parse_san_move(&mut state, san).expect("san should parse back"), mv);
        }
        let sans: Vec<String> = legal.iter().map(|mv| move_to_san(&state, mv, &legal)).collect();
        let mut unique = sans.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), sans.len());
    }

    #[test]
    fn parsing_tolerates_checks_and_redundant_marks() {
        let mut state = GameState::from_fen(VariantSet::empty(), "4k3/8/8/8/8/1N3N2/8/1N2K3 w - - 0 1")
            .expect("position should parse");
        let mv = parse_san_move(&mut state, "Nb3d4+").expect("fully qualified move parses");
        assert_eq!(mv, ChessMove::new(Square::new(0, 1, 2), Square::new(0, 3, 3)));
        assert!(matches!(
            parse_san_move(&mut state, "Nd2"),
            Err(ChessErrors::PgnMoveAmbiguous(_))
        ));
        assert!(matches!(
            parse_san_move(&mut state, "Qd2"),
            Err(ChessErrors::PgnMoveNotFound(_))
        ));
        let castle = GameState::from_fen(VariantSet::empty(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let mut castle = castle.expect("position should parse");
        let mv = parse_san_move(&mut castle, "0-0").expect("zero castling parses");
        assert_eq!(mv.to, Square::new(0, 6, 0));
    }

    #[test]
    fn figurines_follow_the_mover_colour() {
        assert_eq!(san_to_figurine("Nbd4", Color::Light), "♘bd4");
        assert_eq!(san_to_figurine("exd1=Q#", Color::Dark), "exd1=♛#");
        assert_eq!(san_to_figurine("O-O", Color::Dark), "O-O");
    }
}
