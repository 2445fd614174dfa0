//! Castling rook discovery and castling geometry.
//!
//! Castling rights are not a bitmask here. Each right is the pair
//! (castling king, castling rook) recorded at construction; the right is alive
//! while both pieces are unmoved and still on their recorded squares. That
//! covers orthodox corners and Chess960 layouts with the same code.

use crate::game_state::board_geometry::BoardGeometry;
use crate::game_state::chess_types::*;
use crate::game_state::starting_data::PieceSetup;

/// A piece pinned to the square it must still occupy for castling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomePiece {
    pub piece: PieceIndex,
    pub square: Square,
}

/// Resolved castling move for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingPlan {
    pub side: CastlingSide,
    pub king: PieceIndex,
    pub rook: PieceIndex,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// File of `color`'s castling king on board 0's back rank, if any.
pub fn king_setup_file(geometry: &BoardGeometry, pieces: &[PieceSetup], color: Color) -> Option<u8> {
    let back_rank = geometry.back_rank(color);
    pieces.iter().find_map(|piece| {
        let square = piece.square()?;
        (piece.color == color
            && piece.kind == PieceKind::King
            && square.board == 0
            && square.rank == back_rank)
            .then_some(square.file)
    })
}

/// Outermost same-coloured rook on `side` of the king on the back rank.
/// This is how `KQkq` tokens resolve, for Chess960 layouts too.
pub fn discover_castling_file(
    geometry: &BoardGeometry,
    pieces: &[PieceSetup],
    color: Color,
    side: CastlingSide,
) -> Option<u8> {
    let king_file = king_setup_file(geometry, pieces, color)?;
    let back_rank = geometry.back_rank(color);
    let rook_files = pieces.iter().filter_map(|piece| {
        let square = piece.square()?;
        (piece.color == color
            && piece.kind == PieceKind::Rook
            && square.board == 0
            && square.rank == back_rank)
            .then_some(square.file)
    });
    match side {
        CastlingSide::QueenSide => rook_files.filter(|file| *file < king_file).min(),
        CastlingSide::KingSide => rook_files.filter(|file| *file > king_file).max(),
    }
}

/// Is there a same-coloured rook on `file` of the back rank, with the king
/// on the back rank too? Used to validate Shredder-style tokens.
pub fn rook_on_back_rank(
    geometry: &BoardGeometry,
    pieces: &[PieceSetup],
    color: Color,
    file: u8,
) -> Option<CastlingSide> {
    let king_file = king_setup_file(geometry, pieces, color)?;
    let square = Square::new(0, file, geometry.back_rank(color));
    let is_rook = pieces.iter().any(|piece| {
        piece.square() == Some(square) && piece.color == color && piece.kind == PieceKind::Rook
    });
    if !is_rook || file == king_file {
        return None;
    }
    Some(if file < king_file {
        CastlingSide::QueenSide
    } else {
        CastlingSide::KingSide
    })
}

fn home_piece_is_intact(state: &GameState, home: HomePiece, color: Color) -> bool {
    let piece = &state.pieces[home.piece];
    !piece.moved && piece.color == color && piece.location == PieceLocation::Board(home.square)
}

/// Castling plan for `color` and `side` if the right is still alive. Says
/// nothing about obstruction or attacked squares.
pub fn castling_plan(state: &GameState, color: Color, side: CastlingSide) -> Option<CastlingPlan> {
    if !state.rules.castling_enabled {
        return None;
    }
    let king = state.castling_kings[color.index()]?;
    let rook = state.castling_rooks[color.index()][side.index()]?;
    if !home_piece_is_intact(state, king, color)
        || !home_piece_is_intact(state, rook, color)
        || state.pieces[king.piece].kind != PieceKind::King
        || state.pieces[rook.piece].kind != PieceKind::Rook
    {
        return None;
    }
    let width = state.geometry.width;
    let (king_file, rook_file) = match side {
        CastlingSide::QueenSide => (2, 3),
        CastlingSide::KingSide => (width - 2, width - 3),
    };
    let rank = king.square.rank;
    Some(CastlingPlan {
        side,
        king: king.piece,
        rook: rook.piece,
        king_from: king.square,
        king_to: Square::new(king.square.board, king_file, rank),
        rook_from: rook.square,
        rook_to: Square::new(rook.square.board, rook_file, rank),
    })
}

/// Square a castling move is addressed to. Chess960 (and any layout where
/// the landing square is a plain king step) uses king-takes-own-rook.
pub fn castling_target(state: &GameState, plan: &CastlingPlan) -> Square {
    let distance = (plan.king_from.file as i32 - plan.king_to.file as i32).abs();
    if state.rules.is_960 || distance < 2 {
        plan.rook_from
    } else {
        plan.king_to
    }
}

/// Every square between the outermost of the four castling squares is empty
/// apart from the castling king and rook themselves.
pub fn castling_path_is_clear(state: &GameState, plan: &CastlingPlan) -> bool {
    let files = [
        plan.king_from.file,
        plan.king_to.file,
        plan.rook_from.file,
        plan.rook_to.file,
    ];
    let low = files.iter().copied().min().unwrap_or(0);
    let high = files.iter().copied().max().unwrap_or(0);
    (low..=high).all(|file| {
        let square = Square::new(plan.king_from.board, file, plan.king_from.rank);
        match state.piece_at(square) {
            None => true,
            Some(idx) => idx == plan.king || idx == plan.rook,
        }
    })
}

/// Castling plan a move request refers to, if it is a castling move.
pub fn castling_side_for_move(state: &GameState, mv: &ChessMove) -> Option<CastlingPlan> {
    let from = mv.from_square()?;
    let mover = state.piece_at(from)?;
    let color = state.pieces[mover].color;
    CastlingSide::ALL.into_iter().find_map(|side| {
        let plan = castling_plan(state, color, side)?;
        (plan.king == mover && (mv.to == plan.rook_from || mv.to == castling_target(state, &plan)))
            .then_some(plan)
    })
}
