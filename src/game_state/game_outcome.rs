//! Terminal-state detection.
//!
//! Board-derived outcomes are checked after every committed move in a fixed
//! precedence: wins first (checkmate, King of the Hill, exploded king,
//! captured king, third check, destroyed horde, Antichess piece-out and
//! stalemate, flipped king), then draws (Antichess mutual piece-out,
//! stalemate, insufficient material, fifty-move rule, threefold repetition).

use std::fmt;

use crate::game_state::board_geometry::BoardShape;
use crate::game_state::chess_rules::{FIFTY_MOVE_PLIES, REPETITIONS_FOR_DRAW};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::royal_pieces;
use crate::move_generation::legal_move_generator::has_any_legal_move;
use crate::utils::fen_generator::position_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
    KingOfTheHill,
    KingExploded,
    KingCaptured,
    ThreeChecks,
    HordeDestroyed,
    /// Antichess: the winner has no pieces left.
    LostAllPieces,
    /// Antichess: the winner has no legal move.
    Stalemate,
    /// Benedict Chess: the loser's king changed colour.
    KingFlipped,
    Resignation,
    TimeForfeit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    NoPiecesLeft,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
    Agreement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win { winner: Color, reason: WinReason },
    Draw(DrawReason),
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Win { winner, .. } => Some(*winner),
            GameResult::Draw(_) => None,
        }
    }

    /// PGN result token.
    pub fn pgn_token(&self) -> &'static str {
        match self {
            GameResult::Win {
                winner: Color::Light,
                ..
            } => "1-0",
            GameResult::Win {
                winner: Color::Dark,
                ..
            } => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win { winner, reason } => write!(f, "{winner:?} wins by {reason:?}"),
            GameResult::Draw(reason) => write!(f, "Draw by {reason:?}"),
        }
    }
}

fn has_pieces(state: &GameState, color: Color) -> bool {
    state
        .pieces
        .iter()
        .any(|piece| piece.color == color && matches!(piece.location, PieceLocation::Board(_)))
}

#[inline]
pub fn is_check(state: &GameState) -> bool {
    state.in_check
}

/// The side to move is in check and has no legal reply.
pub fn is_checkmate(state: &mut GameState) -> bool {
    state.in_check && !has_any_legal_move(state)
}

/// Board-derived outcome after `mover` has moved. `state.side_to_move` is
/// already the opponent.
pub fn evaluate_outcome(state: &mut GameState, mover: Color) -> Option<GameResult> {
    let opponent = mover.opposite();
    let rules = state.rules;
    let win = |reason| Some(GameResult::Win {
        winner: mover,
        reason,
    });

    let opponent_can_move = has_any_legal_move(state);

    if is_check(state) && !opponent_can_move {
        return win(WinReason::Checkmate);
    }
    if rules.king_of_the_hill
        && royal_pieces(state, mover).iter().any(|idx| {
            state.pieces[*idx]
                .square()
                .is_some_and(|square| state.geometry.is_centre_square(square))
        })
    {
        return win(WinReason::KingOfTheHill);
    }
    let opponent_lost_royalty = rules.royal_kings
        && !(rules.horde && opponent == Color::Light)
        && royal_pieces(state, opponent).is_empty();
    if rules.atomic && opponent_lost_royalty {
        return win(WinReason::KingExploded);
    }
    if rules.dark && opponent_lost_royalty {
        return win(WinReason::KingCaptured);
    }
    if let Some(limit) = rules.checks_to_win {
        if state.checks_given[mover.index()] >= limit {
            return win(WinReason::ThreeChecks);
        }
    }
    if rules.horde && !has_pieces(state, Color::Light) {
        return Some(GameResult::Win {
            winner: Color::Dark,
            reason: WinReason::HordeDestroyed,
        });
    }
    if rules.antichess {
        match (has_pieces(state, mover), has_pieces(state, opponent)) {
            (true, false) => {
                return Some(GameResult::Win {
                    winner: opponent,
                    reason: WinReason::LostAllPieces,
                })
            }
            (false, true) => return win(WinReason::LostAllPieces),
            (false, false) => return Some(GameResult::Draw(DrawReason::NoPiecesLeft)),
            (true, true) => {}
        }
        if !opponent_can_move {
            return Some(GameResult::Win {
                winner: opponent,
                reason: WinReason::Stalemate,
            });
        }
    }
    if rules.benedict && opponent_lost_royalty {
        return win(WinReason::KingFlipped);
    }

    if !opponent_can_move {
        return Some(GameResult::Draw(DrawReason::Stalemate));
    }
    if is_insufficient_material(state) {
        return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
    }
    if rules.fifty_move_rule && state.halfmove_clock >= FIFTY_MOVE_PLIES {
        return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
    }
    if state
        .repetitions
        .get(&position_key(state))
        .is_some_and(|count| *count >= REPETITIONS_FOR_DRAW)
    {
        return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
    }
    None
}

/// Neither side can ever deliver mate (or, in Antichess, lose its pieces).
pub fn is_insufficient_material(state: &GameState) -> bool {
    let rules = state.rules;
    if rules.always_sufficient_material {
        return false;
    }
    let on_board: Vec<&Piece> = state
        .pieces
        .iter()
        .filter(|piece| matches!(piece.location, PieceLocation::Board(_)))
        .collect();
    let in_pocket = state
        .pieces
        .iter()
        .any(|piece| matches!(piece.location, PieceLocation::Pocket(_)));
    if in_pocket {
        return false;
    }

    if rules.antichess {
        // Only bishops, each side's on one colour class, the two classes
        // different: no capture can ever happen.
        let mut classes: [Option<u8>; 2] = [None, None];
        for piece in &on_board {
            if piece.kind != PieceKind::Bishop {
                return false;
            }
            let class = piece.square().map(|square| state.geometry.square_color(square));
            match classes[piece.color.index()] {
                None => classes[piece.color.index()] = class,
                Some(existing) if Some(existing) == class => {}
                Some(_) => return false,
            }
        }
        return matches!(classes, [Some(a), Some(b)] if a != b);
    }

    let extras: Vec<&Piece> = on_board
        .iter()
        .copied()
        .filter(|piece| !piece.is_royal())
        .collect();
    if extras.iter().any(|piece| {
        !matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop)
    }) {
        return false;
    }
    match state.geometry.shape {
        BoardShape::Rectangular if !state.geometry.wraps_files => {
            if extras.len() <= 1 {
                return true;
            }
            // Bishops only, all on one square colour.
            let first = extras[0].square().map(|square| state.geometry.square_color(square));
            extras.iter().all(|piece| {
                piece.kind == PieceKind::Bishop
                    && piece.square().map(|square| state.geometry.square_color(square)) == first
            })
        }
        // Cylinder, circular and hexagonal boards: only a bare king against
        // king plus at most one minor piece is declared dead.
        _ => extras.len() <= 1,
    }
}
