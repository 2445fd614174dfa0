//! Immutable description of where a game starts.
//!
//! Produced by the FEN parser (from a default layout, a caller-supplied FEN
//! or a PGN `FEN` tag) and consumed once by `GameState` construction.

use crate::game_state::chess_types::{Color, PieceKind, PieceLocation, Square};

/// One piece as written in the starting FEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSetup {
    pub kind: PieceKind,
    pub color: Color,
    /// `~` suffix: a promoted pawn.
    pub promoted: bool,
    /// `!` suffix: carries king abilities.
    pub royal: bool,
    pub location: PieceLocation,
}

impl PieceSetup {
    pub fn square(&self) -> Option<Square> {
        match self.location {
            PieceLocation::Board(square) => Some(square),
            _ => None,
        }
    }

    pub fn is_royal(&self) -> bool {
        self.kind == PieceKind::King || self.royal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingData {
    pub turn: Color,
    /// Plies played before this position; nonzero for PGN continuations.
    pub starting_ply: u32,
    /// Castling rook file per `[color][side]`, on board 0.
    pub castling_files: [[Option<u8>; 2]; 2],
    pub en_passant: Option<Square>,
    /// Checks delivered so far by each colour (Three-check).
    pub checks_given: [u8; 2],
    pub halfmove_clock: u32,
    pub pieces: Vec<PieceSetup>,
}

impl StartingData {
    pub fn piece_on(&self, square: Square) -> Option<&PieceSetup> {
        self.pieces.iter().find(|piece| piece.square() == Some(square))
    }

    pub fn fullmove_number(&self) -> u32 {
        self.starting_ply / 2 + 1
    }
}
