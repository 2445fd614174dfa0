//! Starting-position synthesis.
//!
//! Classic, Horde, hexagonal (Glinski) and Alice layouts are fixed FEN
//! strings; Chess960 shuffles the back rank with the usual constraints.

use rand::Rng;

use crate::chess_errors::ChessResult;
use crate::game_state::board_geometry::{BoardGeometry, BoardShape};
use crate::game_state::chess_rules::{
    HEXAGONAL_STARTING_POSITION_FEN, HORDE_STARTING_POSITION_FEN, STARTING_POSITION_FEN,
};
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::variants::{Variant, VariantSet};
use crate::utils::fen_parser::parse_fen;

const CLASSIC_BACK_RANK: &str = "RNBQKBNR";
const EMPTY_PLANE: &str = "8/8/8/8/8/8/8/8";

/// Shuffled Chess960 back rank, white's pieces in uppercase, file a first.
pub fn chess960_back_rank<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut rank: [Option<char>; 8] = [None; 8];

    // One bishop on each square colour.
    rank[rng.random_range(0..4) * 2] = Some('B');
    rank[rng.random_range(0..4) * 2 + 1] = Some('B');

    for piece in ['Q', 'N', 'N'] {
        let free: Vec<usize> = (0..8).filter(|idx| rank[*idx].is_none()).collect();
        let pick = free[rng.random_range(0..free.len())];
        rank[pick] = Some(piece);
    }

    // King between the rooks on the three remaining files.
    for (slot, piece) in (0..8)
        .filter(|idx| rank[*idx].is_none())
        .collect::<Vec<_>>()
        .into_iter()
        .zip(['R', 'K', 'R'])
    {
        rank[slot] = Some(piece);
    }

    rank.iter().map(|piece| piece.unwrap_or('R')).collect()
}

/// Default starting FEN for a variant set.
pub fn default_starting_fen<R: Rng + ?Sized>(variants: VariantSet, rng: &mut R) -> String {
    if variants.contains(Variant::Hexagonal) {
        return HEXAGONAL_STARTING_POSITION_FEN.to_owned();
    }
    let back_rank = if variants.contains(Variant::Chess960) {
        chess960_back_rank(rng)
    } else {
        CLASSIC_BACK_RANK.to_owned()
    };
    let plane = if variants.contains(Variant::Horde) {
        let standard = HORDE_STARTING_POSITION_FEN
            .split_whitespace()
            .next()
            .unwrap_or(EMPTY_PLANE);
        standard.replacen("rnbqkbnr", &back_rank.to_ascii_lowercase(), 1)
    } else {
        format!(
            "{}/pppppppp/8/8/8/8/PPPPPPPP/{}",
            back_rank.to_ascii_lowercase(),
            back_rank
        )
    };
    let castling = if variants.contains(Variant::Horde) {
        "kq"
    } else if variants.contains(Variant::Antichess) || variants.contains(Variant::CircularChess) {
        "-"
    } else {
        "KQkq"
    };
    let pocket = if variants.contains(Variant::Crazyhouse) {
        "/"
    } else {
        ""
    };
    let extra_board = if variants.contains(Variant::AliceChess) {
        format!(" {EMPTY_PLANE}")
    } else {
        String::new()
    };
    let checks = if variants.contains(Variant::ThreeCheck) {
        " +0+0"
    } else {
        ""
    };
    format!("{plane}{pocket}{extra_board} w {castling} - 0 1{checks}")
}

/// Non-pawn home squares of the variant's default layout, used for Circe
/// rebirth. Chess960 passes the game's own starting pieces instead.
pub fn default_home_squares(
    variants: VariantSet,
    geometry: &BoardGeometry,
) -> ChessResult<Vec<(Color, PieceKind, Square)>> {
    let fen = if variants.contains(Variant::Hexagonal) {
        HEXAGONAL_STARTING_POSITION_FEN
    } else if variants.contains(Variant::Horde) {
        HORDE_STARTING_POSITION_FEN
    } else {
        STARTING_POSITION_FEN
    };
    // Parse on a single board without pockets; only placement matters.
    let plain = VariantSet::of(match geometry.shape {
        BoardShape::Hexagonal => &[Variant::Hexagonal],
        _ => &[],
    });
    let plain_geometry = BoardGeometry::from_variants(plain);
    let data = parse_fen(plain, &plain_geometry, fen)?;
    Ok(data
        .pieces
        .iter()
        .filter(|piece| piece.kind != PieceKind::Pawn)
        .filter_map(|piece| Some((piece.color, piece.kind, piece.square()?)))
        .collect())
}
