//! Mode-parameterized target generation for a single piece.
//!
//! `possible_moves` is the one routine every other component asks for
//! squares: legality, check detection, castling transit, Benedict flips,
//! Patrol and Madrasi observation, and Dark Chess vision all differ only in
//! the `SquareMode` they pass.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{is_paralyzed, is_patrolled};
use crate::move_generation::legal_move_shared::{occupant, Occupant};
use crate::moves::bishop_moves::bishop_targets;
use crate::moves::king_moves::{castling_targets, king_targets};
use crate::moves::knight_moves::knight_targets;
use crate::moves::pawn_moves::pawn_targets;
use crate::moves::rook_moves::rook_targets;

/// Generation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareMode {
    /// Pseudo-legal destinations of a real move (own-king safety not yet
    /// checked).
    ForActualMove,
    /// Squares the piece can capture on right now. Honours Patrol and
    /// Madrasi.
    Attacked,
    /// Raw attack pattern, blockers included, no variant restrictions.
    Controlled,
    /// Every square the piece could ever reach along its lines, ignoring
    /// occupancy.
    Possible,
    /// Dark Chess vision.
    Visible,
    /// `Possible` plus castling targets whose rights are alive.
    Premove,
}

/// Target squares of the piece at `piece` under `mode`, without duplicates.
/// Pocketed and captured pieces have none.
pub fn possible_moves(state: &GameState, piece: PieceIndex, mode: SquareMode) -> Vec<Square> {
    let current = &state.pieces[piece];
    let Some(from) = current.square() else {
        return Vec::new();
    };
    let color = current.color;
    let royal = current.is_royal() && state.rules.royal_kings;

    if state.rules.madrasi
        && !royal
        && matches!(mode, SquareMode::ForActualMove | SquareMode::Attacked)
        && is_paralyzed(state, piece)
    {
        return Vec::new();
    }

    let movement = current.movement();
    let mut out = Vec::with_capacity(32);
    if movement.rook {
        rook_targets(state, from, color, mode, &mut out);
    }
    if movement.bishop {
        bishop_targets(state, from, color, mode, &mut out);
    }
    if movement.knight {
        knight_targets(state, from, color, mode, &mut out);
    }
    if movement.king {
        king_targets(state, from, color, mode, &mut out);
    }
    if movement.pawn {
        pawn_targets(state, from, color, mode, &mut out);
    }
    out.sort_unstable();
    out.dedup();

    if state.rules.patrol && !royal {
        match mode {
            SquareMode::Attacked if !is_patrolled(state, piece) => return Vec::new(),
            SquareMode::ForActualMove if !is_patrolled(state, piece) => {
                out.retain(|square| occupant(state, *square, color) != Occupant::Enemy);
            }
            _ => {}
        }
    }

    if state.rules.alice && mode == SquareMode::ForActualMove {
        // A real move passes through to the next board and needs an empty
        // landing cell there. Castling checks this itself.
        let next = state.geometry.next_board(from.board);
        out.retain(|square| state.piece_at(square.on_board(next)).is_none());
    }

    if current.kind == PieceKind::King && matches!(mode, SquareMode::ForActualMove | SquareMode::Premove) {
        let mut castles = Vec::new();
        castling_targets(state, piece, mode, &mut castles);
        for target in castles {
            if !out.contains(&target) {
                out.push(target);
            }
        }
    }

    out
}
