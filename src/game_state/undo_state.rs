use crate::game_state::chess_types::*;
use crate::game_state::game_outcome::{GameResult, GameStatus};

/// Pre-move copy of one piece's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub piece: PieceIndex,
    pub kind: PieceKind,
    pub color: Color,
    pub moved: bool,
    pub abilities: Option<PieceKind>,
    pub location: PieceLocation,
}

/// Memento for one `perform_move`: every piece the move touched plus the
/// scalar position fields. Applied by [`revert_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub touched: Vec<PieceSnapshot>,

    pub prev_side_to_move: Color,
    pub prev_in_check: bool,
    pub prev_en_passant: Option<EnPassant>,
    pub prev_checks_given: [u8; 2],
    pub prev_halfmove_clock: u32,
    pub prev_ply: u32,
    pub prev_status: GameStatus,
    pub prev_result: Option<GameResult>,

    /// Repetition entry incremented by a committed move.
    pub repetition_key: Option<String>,
}

impl UndoState {
    pub fn capture(state: &GameState) -> Self {
        Self {
            touched: Vec::new(),
            prev_side_to_move: state.side_to_move,
            prev_in_check: state.in_check,
            prev_en_passant: state.en_passant,
            prev_checks_given: state.checks_given,
            prev_halfmove_clock: state.halfmove_clock,
            prev_ply: state.ply,
            prev_status: state.status,
            prev_result: state.result,
            repetition_key: None,
        }
    }

    /// Records `piece` before its first mutation in this move.
    pub fn touch(&mut self, state: &GameState, piece: PieceIndex) {
        if self.touched.iter().any(|snapshot| snapshot.piece == piece) {
            return;
        }
        let current = &state.pieces[piece];
        self.touched.push(PieceSnapshot {
            piece,
            kind: current.kind,
            color: current.color,
            moved: current.moved,
            abilities: current.abilities,
            location: current.location,
        });
    }
}

/// Restores the position captured in `undo`. Reverts must be applied in the
/// reverse order of the moves that produced them.
pub fn revert_move(state: &mut GameState, undo: UndoState) {
    // Clear every touched piece's current cell first so restoring one piece
    // cannot be overwritten by clearing another.
    for snapshot in &undo.touched {
        if let PieceLocation::Board(square) = state.pieces[snapshot.piece].location {
            let cell = state.geometry.cell_index(square);
            if state.board[cell] == Some(snapshot.piece) {
                state.board[cell] = None;
            }
        }
    }
    for snapshot in undo.touched {
        let piece = &mut state.pieces[snapshot.piece];
        piece.kind = snapshot.kind;
        piece.color = snapshot.color;
        piece.moved = snapshot.moved;
        piece.abilities = snapshot.abilities;
        piece.location = snapshot.location;
        if let PieceLocation::Board(square) = snapshot.location {
            let cell = state.geometry.cell_index(square);
            state.board[cell] = Some(snapshot.piece);
        }
    }

    if let Some(key) = undo.repetition_key {
        if let Some(count) = state.repetitions.get_mut(&key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.repetitions.remove(&key);
            }
        }
    }

    state.side_to_move = undo.prev_side_to_move;
    state.in_check = undo.prev_in_check;
    state.en_passant = undo.prev_en_passant;
    state.checks_given = undo.prev_checks_given;
    state.halfmove_clock = undo.prev_halfmove_clock;
    state.ply = undo.prev_ply;
    state.status = undo.prev_status;
    state.result = undo.prev_result;
}
