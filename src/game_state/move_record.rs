use crate::game_state::chess_types::*;

/// One committed move in the game transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub chess_move: ChessMove,
    pub color: Color,
    /// Kind of the moving piece before the move.
    pub piece_kind: PieceKind,
    pub san: String,
    pub figurine: String,
    pub uci: String,
    pub capture: bool,
    pub castling: Option<CastlingSide>,
    /// Material value each colour lost on this move.
    pub material_lost: [u32; 2],
    /// Memento restoring the position from before this move.
    pub undo: UndoState,
}
