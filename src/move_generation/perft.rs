use std::thread;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::castling::castling_side_for_move;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::revert_move;
use crate::move_generation::legal_move_apply::{is_capture, perform_move, MoveMode};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{has_any_legal_move, legal_moves};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub drops: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.drops += rhs.drops;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf statistics of the legal move tree of `depth` plies. The position is
/// restored before returning.
pub fn perft(game_state: &mut GameState, depth: u8) -> ChessResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(game_state, depth, &mut total)?;
    Ok(total)
}

/// Same as [`perft`], one worker per root move, each on its own copy of the
/// position.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> ChessResult<PerftCounts> {
    if depth <= 1 {
        return perft(&mut game_state.clone(), depth);
    }
    let mut root = game_state.clone();
    let root_moves = legal_moves(&mut root);

    let results: Vec<ChessResult<PerftCounts>> = thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|mv| {
                let mut local_state = game_state.clone();
                scope.spawn(move || -> ChessResult<PerftCounts> {
                    let mut local = PerftCounts::default();
                    perform_move(&mut local_state, mv, MoveMode::LegalityProbe)?;
                    perft_recurse(&mut local_state, depth - 1, &mut local)?;
                    Ok(local)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(ChessErrors::InternalInvariant(
                        "perft worker thread panicked".to_owned(),
                    ))
                })
            })
            .collect()
    });

    let mut total = PerftCounts::default();
    for result in results {
        total.merge(result?);
    }
    Ok(total)
}

fn perft_recurse(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) -> ChessResult<()> {
    for mv in legal_moves(game_state) {
        if depth == 1 {
            count_leaf(game_state, &mv, counts)?;
            continue;
        }
        let applied = perform_move(game_state, &mv, MoveMode::LegalityProbe)?;
        let result = perft_recurse(game_state, depth - 1, counts);
        revert_move(game_state, applied.undo);
        result?;
    }
    Ok(())
}

fn count_leaf(game_state: &mut GameState, mv: &ChessMove, counts: &mut PerftCounts) -> ChessResult<()> {
    counts.nodes += 1;
    if is_capture(game_state, mv) {
        counts.captures += 1;
        if game_state.piece_at(mv.to).is_none() {
            counts.en_passant += 1;
        }
    }
    if castling_side_for_move(game_state, mv).is_some() {
        counts.castles += 1;
    }
    if mv.promotion.is_some() {
        counts.promotions += 1;
    }
    if matches!(mv.from, MoveOrigin::Drop(_)) {
        counts.drops += 1;
    }

    if game_state.rules.tracks_check() {
        let applied = perform_move(game_state, mv, MoveMode::LegalityProbe)?;
        if is_king_in_check(game_state, game_state.side_to_move) {
            counts.checks += 1;
            if !has_any_legal_move(game_state) {
                counts.checkmates += 1;
            }
        }
        revert_move(game_state, applied.undo);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_multi_threaded};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};

    const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3_FEN: &str = "8/2p5/3p4/KP5r/1R3p2/4P3/6P1/8 w - - 0 1";

    fn orthodox(fen: &str) -> GameState {
        GameState::from_fen(VariantSet::empty(), fen).expect("position should parse")
    }

    #[test]
    fn start_position_counts() {
        let mut state = orthodox(STARTING_POSITION_FEN);
        assert_eq!(perft(&mut state, 1).expect("perft").nodes, 20);
        assert_eq!(perft(&mut state, 2).expect("perft").nodes, 400);
        let depth_3 = perft(&mut state, 3).expect("perft");
        assert_eq!(depth_3.nodes, 8_902);
        assert_eq!(depth_3.captures, 34);
        assert_eq!(depth_3.checks, 12);
        assert_eq!(state.get_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn kiwipete_counts() {
        let mut state = orthodox(KIWIPETE_FEN);
        let depth_1 = perft(&mut state, 1).expect("perft");
        assert_eq!(depth_1.nodes, 48);
        assert_eq!(depth_1.captures, 8);
        assert_eq!(depth_1.castles, 2);
        let depth_2 = perft(&mut state, 2).expect("perft");
        assert_eq!(depth_2.nodes, 2_039);
        assert_eq!(depth_2.en_passant, 1);
    }

    #[test]
    fn position_3_counts() {
        let mut state = orthodox(POSITION_3_FEN);
        assert_eq!(perft(&mut state, 1).expect("perft").nodes, 14);
        assert_eq!(perft(&mut state, 2).expect("perft").nodes, 191);
        assert_eq!(perft(&mut state, 3).expect("perft").nodes, 2_812);
    }

    #[test]
    fn threaded_perft_matches_single_threaded_for_variants() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::Crazyhouse]),
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R/Pn w KQkq - 0 4",
        )
        .expect("crazyhouse position should parse");
        let threaded = perft_multi_threaded(&state, 2).expect("threaded perft");
        let single = perft(&mut state.clone(), 2).expect("perft");
        assert_eq!(threaded, single);
        assert!(single.drops > 0);
    }
}
