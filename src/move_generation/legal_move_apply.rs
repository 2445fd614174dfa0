//! Move execution with full undo capture.
//!
//! `perform_move` is used both to probe candidate legality and to commit the
//! move a player makes, so the two can never disagree. Variant side effects
//! run in a fixed order after the basic relocation: atomic explosion,
//! absorption, Frankfurt swap, Circe rebirth, Crazyhouse pocketing,
//! Benedict flips and finally the Alice board transfer. En passant and
//! castling are resolved as part of the relocation itself.

use log::trace;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::castling::{castling_side_for_move, CastlingPlan};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::revert_move;
use crate::move_generation::legal_move_checks::{is_king_in_check, royal_pieces};
use crate::move_generation::move_generator::{possible_moves, SquareMode};
use crate::move_generation::variant_effects::{
    absorb, circe_rebirth_square, frankfurt_transform, material_on_board,
};
use crate::utils::fen_generator::position_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Simulate only: no repetition bookkeeping, no check flag update.
    LegalityProbe,
    /// A move actually played. Illegal moves are reverted and rejected.
    Commit,
}

/// Result of `perform_move`. The position is left in the post-move state;
/// hand `undo` to `revert_move` to restore it.
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub undo: UndoState,
    pub mover: PieceIndex,
    pub mover_kind: PieceKind,
    pub captured: Option<PieceIndex>,
    pub castling: Option<CastlingSide>,
    /// Material value each colour lost on the board (Commit only).
    pub material_lost: [u32; 2],
    /// Mover's own royalty survived and, where required, is not attacked.
    pub legal: bool,
}

/// Moves `piece` to `location`, keeping the board cache consistent.
pub fn relocate(
    state: &mut GameState,
    undo: &mut UndoState,
    piece: PieceIndex,
    location: PieceLocation,
) -> ChessResult<()> {
    undo.touch(state, piece);
    if let PieceLocation::Board(square) = state.pieces[piece].location {
        let cell = state.geometry.cell_index(square);
        if state.board[cell] == Some(piece) {
            state.board[cell] = None;
        }
    }
    if let PieceLocation::Board(square) = location {
        if !state.geometry.contains(square) {
            return Err(ChessErrors::InternalInvariant(format!(
                "relocation to missing square {square:?}"
            )));
        }
        let cell = state.geometry.cell_index(square);
        if let Some(occupant) = state.board[cell] {
            return Err(ChessErrors::InternalInvariant(format!(
                "square {square:?} already holds {}",
                state.pieces[occupant].id
            )));
        }
        state.board[cell] = Some(piece);
    }
    state.pieces[piece].location = location;
    Ok(())
}

/// Removed piece goes to the capturer's pocket when pockets are in use.
fn dispose(
    state: &mut GameState,
    undo: &mut UndoState,
    piece: PieceIndex,
    capturer: Color,
) -> ChessResult<()> {
    if state.rules.uses_pockets {
        relocate(state, undo, piece, PieceLocation::Pocket(capturer))?;
        let pocketed = &mut state.pieces[piece];
        pocketed.color = capturer;
        pocketed.kind = pocketed.original_kind;
        pocketed.abilities = None;
        Ok(())
    } else {
        relocate(state, undo, piece, PieceLocation::Nowhere)
    }
}

fn resolve_mover(state: &GameState, mv: &ChessMove, color: Color) -> ChessResult<PieceIndex> {
    let mover = match mv.from {
        MoveOrigin::Square(from) => state.piece_at(from),
        MoveOrigin::Drop(kind) => state
            .pocket(color)
            .find(|idx| state.pieces[*idx].kind == kind),
    };
    match mover {
        Some(idx) if state.pieces[idx].color == color => Ok(idx),
        _ => Err(ChessErrors::IllegalMove(format!(
            "no {color:?} piece at the move origin"
        ))),
    }
}

/// Piece captured by `mover` moving to `to`, including en passant.
fn captured_piece(state: &GameState, mover: PieceIndex, to: Square) -> Option<PieceIndex> {
    let color = state.pieces[mover].color;
    if let Some(occupant) = state.piece_at(to) {
        return (state.pieces[occupant].color != color).then_some(occupant);
    }
    let ep = state.en_passant?;
    (state.pieces[mover].kind == PieceKind::Pawn
        && ep.target == to
        && state.pieces[ep.pawn].color != color)
        .then_some(ep.pawn)
}

/// Does `mv` capture anything (en passant included)?
pub fn is_capture(state: &GameState, mv: &ChessMove) -> bool {
    let Some(from) = mv.from_square() else {
        return false;
    };
    let Some(mover) = state.piece_at(from) else {
        return false;
    };
    if castling_side_for_move(state, mv).is_some() {
        return false;
    }
    captured_piece(state, mover, mv.to).is_some()
}

/// Applies `mv` for the side to move. Never leaves a half-applied move: any
/// error restores the pre-move position before returning.
pub fn perform_move(state: &mut GameState, mv: &ChessMove, mode: MoveMode) -> ChessResult<AppliedMove> {
    let mut undo = UndoState::capture(state);
    let effects = match apply(state, mv, mode, &mut undo) {
        Ok(effects) => effects,
        Err(error) => {
            revert_move(state, undo);
            return Err(error);
        }
    };
    if mode == MoveMode::Commit && !effects.legal {
        revert_move(state, undo);
        return Err(ChessErrors::IllegalMove(
            "move leaves the mover's king exposed".to_owned(),
        ));
    }
    Ok(AppliedMove {
        undo,
        mover: effects.mover,
        mover_kind: effects.mover_kind,
        captured: effects.captured,
        castling: effects.castling,
        material_lost: effects.material_lost,
        legal: effects.legal,
    })
}

struct MoveEffects {
    mover: PieceIndex,
    mover_kind: PieceKind,
    captured: Option<PieceIndex>,
    castling: Option<CastlingSide>,
    material_lost: [u32; 2],
    legal: bool,
}

fn apply(
    state: &mut GameState,
    mv: &ChessMove,
    mode: MoveMode,
    undo: &mut UndoState,
) -> ChessResult<MoveEffects> {
    let color = state.side_to_move;
    let opponent = color.opposite();
    let rules = state.rules;
    let mover = resolve_mover(state, mv, color)?;
    let mover_kind = state.pieces[mover].kind;
    let had_royalty = !royal_pieces(state, color).is_empty();
    let material_before = if mode == MoveMode::Commit {
        [material_on_board(state, Color::Light), material_on_board(state, Color::Dark)]
    } else {
        [0, 0]
    };

    let castling: Option<CastlingPlan> = match mv.from {
        MoveOrigin::Square(_) => castling_side_for_move(state, mv),
        MoveOrigin::Drop(_) => None,
    };
    let mut captured = None;
    let landing;

    match (mv.from, castling) {
        (MoveOrigin::Drop(_), _) => {
            if state.piece_at(mv.to).is_some() {
                return Err(ChessErrors::IllegalMove("drop onto an occupied square".to_owned()));
            }
            relocate(state, undo, mover, PieceLocation::Board(mv.to))?;
            landing = mv.to;
        }
        (MoveOrigin::Square(_), Some(plan)) => {
            relocate(state, undo, plan.king, PieceLocation::Nowhere)?;
            relocate(state, undo, plan.rook, PieceLocation::Nowhere)?;
            relocate(state, undo, plan.king, PieceLocation::Board(plan.king_to))?;
            relocate(state, undo, plan.rook, PieceLocation::Board(plan.rook_to))?;
            state.pieces[plan.rook].moved = true;
            landing = plan.king_to;
            trace!("castling {:?} for {color:?}", plan.side);
        }
        (MoveOrigin::Square(_), None) => {
            captured = captured_piece(state, mover, mv.to);
            if let Some(victim) = captured {
                relocate(state, undo, victim, PieceLocation::Nowhere)?;
            }
            relocate(state, undo, mover, PieceLocation::Board(mv.to))?;
            if let Some(kind) = mv.promotion {
                state.pieces[mover].kind = kind;
            }
            landing = mv.to;
        }
    }
    state.pieces[mover].moved = true;

    if let Some(victim) = captured {
        if rules.atomic {
            explode(state, undo, mover, landing)?;
        } else {
            if rules.absorption {
                absorb(state, undo, mover, victim);
            }
            if rules.frankfurt {
                frankfurt_transform(state, undo, mover, victim, landing);
            }
            let reborn = if rules.circe {
                circe_rebirth_square(state, victim, landing)
            } else {
                None
            };
            match reborn {
                Some(square) => relocate(state, undo, victim, PieceLocation::Board(square))?,
                None => dispose(state, undo, victim, color)?,
            }
        }
    }

    if rules.benedict {
        let mut movers = vec![mover];
        if let Some(plan) = castling {
            movers.push(plan.rook);
        }
        flip_controlled(state, undo, &movers, color);
    }

    if rules.alice {
        if let MoveOrigin::Square(_) = mv.from {
            alice_transfer(state, undo, mover, castling.map(|plan| plan.rook), color)?;
        }
    }

    state.en_passant = None;
    if mover_kind == PieceKind::Pawn && castling.is_none() {
        if let (Some(from), Some(square)) = (mv.from_square(), state.pieces[mover].square()) {
            let forward = state.geometry.pawn_forward(from, color);
            let skipped = state.geometry.square_in_direction(from, forward);
            let double = skipped.and_then(|one| state.geometry.square_in_direction(one, forward));
            if let (Some(skipped), Some(double)) = (skipped, double) {
                if double.loose_eq(&mv.to) {
                    state.en_passant = Some(EnPassant {
                        target: skipped.on_board(square.board),
                        pawn: mover,
                    });
                }
            }
        }
    }

    let resets_clock = captured.is_some()
        || (mover_kind == PieceKind::Pawn && rules.pawn_moves_reset_fifty);
    state.halfmove_clock = if resets_clock { 0 } else { state.halfmove_clock + 1 };
    state.side_to_move = opponent;
    state.ply += 1;

    let mut legal = true;
    if rules.kings_must_survive && had_royalty && royal_pieces(state, color).is_empty() {
        legal = false;
    }
    if legal
        && rules.tracks_check()
        && !rules.leave_in_check_allowed
        && is_king_in_check(state, color)
    {
        legal = false;
    }

    let mut material_lost = [0, 0];
    if mode == MoveMode::Commit && legal {
        state.in_check = rules.tracks_check() && is_king_in_check(state, opponent);
        if state.in_check && rules.checks_to_win.is_some() {
            state.checks_given[color.index()] += 1;
        }
        for side in Color::ALL {
            material_lost[side.index()] =
                material_before[side.index()].saturating_sub(material_on_board(state, side));
        }
        let key = position_key(state);
        *state.repetitions.entry(key.clone()).or_insert(0) += 1;
        undo.repetition_key = Some(key);
    }

    Ok(MoveEffects {
        mover,
        mover_kind,
        captured,
        castling: castling.map(|plan| plan.side),
        material_lost,
        legal,
    })
}

/// Atomic: the capturer and every non-pawn piece next to the capture square
/// are removed along with the captured piece.
fn explode(
    state: &mut GameState,
    undo: &mut UndoState,
    capturer: PieceIndex,
    center: Square,
) -> ChessResult<()> {
    relocate(state, undo, capturer, PieceLocation::Nowhere)?;
    for square in state.geometry.neighbourhood(center) {
        let Some(victim) = state.piece_at(square) else {
            continue;
        };
        if state.pieces[victim].kind != PieceKind::Pawn {
            relocate(state, undo, victim, PieceLocation::Nowhere)?;
        }
    }
    Ok(())
}

/// Benedict: enemies controlled by the moved pieces change sides.
fn flip_controlled(state: &mut GameState, undo: &mut UndoState, movers: &[PieceIndex], color: Color) {
    let mut flipped = Vec::new();
    for mover in movers {
        for square in possible_moves(state, *mover, SquareMode::Controlled) {
            if let Some(target) = state.piece_at(square) {
                if state.pieces[target].color != color && !flipped.contains(&target) {
                    flipped.push(target);
                }
            }
        }
    }
    for target in flipped {
        undo.touch(state, target);
        state.pieces[target].color = color;
    }
}

/// Alice: the moved piece (and a castled rook) pass to the next board.
fn alice_transfer(
    state: &mut GameState,
    undo: &mut UndoState,
    mover: PieceIndex,
    castled_rook: Option<PieceIndex>,
    color: Color,
) -> ChessResult<()> {
    if let Some(square) = state.pieces[mover].square() {
        let target = square.on_board(state.geometry.next_board(square.board));
        if state.piece_at(target).is_some() {
            return Err(ChessErrors::IllegalMove(
                "looking-glass square is occupied".to_owned(),
            ));
        }
        relocate(state, undo, mover, PieceLocation::Board(target))?;
    }
    if let Some(rook) = castled_rook {
        if let Some(square) = state.pieces[rook].square() {
            let target = square.on_board(state.geometry.next_board(square.board));
            if state.piece_at(target).is_some() {
                if state.rules.uses_pockets {
                    relocate(state, undo, rook, PieceLocation::Pocket(color))?;
                } else {
                    relocate(state, undo, rook, PieceLocation::Nowhere)?;
                }
            } else {
                relocate(state, undo, rook, PieceLocation::Board(target))?;
            }
        }
    }
    Ok(())
}
