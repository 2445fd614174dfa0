//! Core value types shared by every engine module.
//!
//! Pieces are owned by `GameState::pieces` and addressed by `PieceIndex`;
//! the board array only caches which index stands on which square.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    pub const fn fen_char(self) -> char {
        match self {
            Color::Light => 'w',
            Color::Dark => 'b',
        }
    }
}

/// Piece kind (color is stored separately on `Piece`).
///
/// Empress, Cardinal and Amazon only arise from Absorption / Frankfurt
/// captures or from FEN input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    Empress,
    Cardinal,
    Amazon,
}

impl PieceKind {
    pub const ALL: [PieceKind; 9] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Empress,
        PieceKind::Cardinal,
        PieceKind::Amazon,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
            PieceKind::Empress => 6,
            PieceKind::Cardinal => 7,
            PieceKind::Amazon => 8,
        }
    }

    /// Uppercase FEN / SAN letter.
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
            PieceKind::Empress => 'E',
            PieceKind::Cardinal => 'C',
            PieceKind::Amazon => 'A',
        }
    }

    /// Case-insensitive inverse of [`PieceKind::letter`].
    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            'E' => Some(PieceKind::Empress),
            'C' => Some(PieceKind::Cardinal),
            'A' => Some(PieceKind::Amazon),
            _ => None,
        }
    }

    pub const fn movement(self) -> Movement {
        let none = Movement {
            pawn: false,
            knight: false,
            bishop: false,
            rook: false,
            king: false,
        };
        match self {
            PieceKind::Pawn => Movement { pawn: true, ..none },
            PieceKind::Knight => Movement { knight: true, ..none },
            PieceKind::Bishop => Movement { bishop: true, ..none },
            PieceKind::Rook => Movement { rook: true, ..none },
            PieceKind::Queen => Movement {
                rook: true,
                bishop: true,
                ..none
            },
            PieceKind::King => Movement { king: true, ..none },
            PieceKind::Empress => Movement {
                rook: true,
                knight: true,
                ..none
            },
            PieceKind::Cardinal => Movement {
                bishop: true,
                knight: true,
                ..none
            },
            PieceKind::Amazon => Movement {
                rook: true,
                bishop: true,
                knight: true,
                ..none
            },
        }
    }

    /// Smallest kind whose movement is exactly the rook/bishop/knight part of
    /// `movement`. Ranked Amazon > Queen > Empress/Cardinal > Rook/Bishop/Knight.
    pub const fn from_movement(movement: Movement) -> Option<PieceKind> {
        match (movement.rook, movement.bishop, movement.knight) {
            (true, true, true) => Some(PieceKind::Amazon),
            (true, true, false) => Some(PieceKind::Queen),
            (true, false, true) => Some(PieceKind::Empress),
            (false, true, true) => Some(PieceKind::Cardinal),
            (true, false, false) => Some(PieceKind::Rook),
            (false, true, false) => Some(PieceKind::Bishop),
            (false, false, true) => Some(PieceKind::Knight),
            (false, false, false) => None,
        }
    }

    /// Material value in pawns.
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Cardinal => 6,
            PieceKind::Empress => 8,
            PieceKind::Queen => 9,
            PieceKind::Amazon => 12,
            PieceKind::King => 0,
        }
    }
}

/// Movement capabilities a piece combines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub pawn: bool,
    pub knight: bool,
    pub bishop: bool,
    pub rook: bool,
    pub king: bool,
}

impl Movement {
    pub const fn union(self, other: Movement) -> Movement {
        Movement {
            pawn: self.pawn || other.pawn,
            knight: self.knight || other.knight,
            bishop: self.bishop || other.bishop,
            rook: self.rook || other.rook,
            king: self.king || other.king,
        }
    }
}

/// A cell on one of the boards: (board index, file, rank), all zero based.
///
/// Derived equality is the "exact" comparison. Alice Chess cross-board checks
/// use [`Square::loose_eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub board: u8,
    pub file: u8,
    pub rank: u8,
}

impl Square {
    #[inline]
    pub const fn new(board: u8, file: u8, rank: u8) -> Self {
        Self { board, file, rank }
    }

    /// Board-insensitive comparison.
    #[inline]
    pub const fn loose_eq(&self, other: &Square) -> bool {
        self.file == other.file && self.rank == other.rank
    }

    #[inline]
    pub const fn on_board(self, board: u8) -> Square {
        Square { board, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceLocation {
    Board(Square),
    /// Held in this color's pocket (Crazyhouse).
    Pocket(Color),
    /// Captured or exploded. Pieces are never deleted.
    Nowhere,
}

/// Index into `GameState::pieces`.
pub type PieceIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// Stable for the lifetime of the game.
    pub id: String,
    pub kind: PieceKind,
    /// Kind at creation; promoted pawns keep `Pawn` here.
    pub original_kind: PieceKind,
    pub color: Color,
    pub moved: bool,
    /// Secondary kind. `Some(King)` marks a royal compound piece.
    pub abilities: Option<PieceKind>,
    pub location: PieceLocation,
}

impl Piece {
    pub fn movement(&self) -> Movement {
        match self.abilities {
            Some(extra) => self.kind.movement().union(extra.movement()),
            None => self.kind.movement(),
        }
    }

    /// King or king-abilities piece. Whether royalty matters at all depends on
    /// the variant (Antichess has none).
    pub fn is_royal(&self) -> bool {
        self.kind == PieceKind::King || self.abilities == Some(PieceKind::King)
    }

    pub fn square(&self) -> Option<Square> {
        match self.location {
            PieceLocation::Board(square) => Some(square),
            _ => None,
        }
    }

    pub fn is_promoted_pawn(&self) -> bool {
        self.original_kind == PieceKind::Pawn && self.kind != PieceKind::Pawn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    QueenSide,
    KingSide,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::QueenSide, CastlingSide::KingSide];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            CastlingSide::QueenSide => 0,
            CastlingSide::KingSide => 1,
        }
    }
}

/// Capturable pawn after a double step: the skipped square and the pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    pub target: Square,
    pub pawn: PieceIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOrigin {
    Square(Square),
    /// Drop of a pocket piece of this kind.
    Drop(PieceKind),
}

/// A move request. For castling `to` is the king's landing square, or the
/// castling rook's square under Chess960.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: MoveOrigin,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl ChessMove {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from: MoveOrigin::Square(from),
            to,
            promotion: None,
        }
    }

    pub const fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from: MoveOrigin::Square(from),
            to,
            promotion: Some(promotion),
        }
    }

    pub const fn drop(kind: PieceKind, to: Square) -> Self {
        Self {
            from: MoveOrigin::Drop(kind),
            to,
            promotion: None,
        }
    }

    pub fn from_square(&self) -> Option<Square> {
        match self.from {
            MoveOrigin::Square(square) => Some(square),
            MoveOrigin::Drop(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Movement, PieceKind, Square};

    #[test]
    fn merged_movement_resolves_compound_kinds() {
        let merged = PieceKind::Rook
            .movement()
            .union(PieceKind::Knight.movement());
        assert_eq!(PieceKind::from_movement(merged), Some(PieceKind::Empress));

        let amazon = PieceKind::Queen
            .movement()
            .union(PieceKind::Cardinal.movement());
        assert_eq!(PieceKind::from_movement(amazon), Some(PieceKind::Amazon));
        assert_eq!(PieceKind::from_movement(Movement::default()), None);
    }

    #[test]
    fn loose_equality_ignores_board() {
        let a = Square::new(0, 4, 3);
        let b = Square::new(1, 4, 3);
        assert_ne!(a, b);
        assert!(a.loose_eq(&b));
    }
}
