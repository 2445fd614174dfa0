//! Dark Chess fog of war.
//!
//! Each colour sees the squares its own pieces could move to or attack,
//! blockers included, plus the squares its pieces stand on. With several
//! boards a visible cell is visible on every board. Opponent pieces are
//! reported under opaque ids that are regenerated whenever a piece comes
//! back into sight, so id continuity never reveals where a hidden piece went.

use std::collections::{BTreeSet, HashMap};

use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

use crate::game_state::chess_types::*;
use crate::game_state::move_record::MoveRecord;
use crate::move_generation::move_generator::{possible_moves, SquareMode};
use crate::utils::algebraic::square_to_text;

/// A piece as one player sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisiblePiece {
    pub id: String,
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

/// A transcript entry with everything the viewer may not know removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedMove {
    pub color: Color,
    pub from: Option<Square>,
    pub to: Option<Square>,
    pub capture: bool,
    pub notation: String,
}

/// One player's private picture of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DarkChessView {
    pub color: Color,
    pub visible_squares: BTreeSet<Square>,
    pub pieces: Vec<VisiblePiece>,
    pub transcript: Vec<RedactedMove>,
    /// Opponent piece -> (opaque id, kind it had when the id was issued).
    opaque_ids: HashMap<PieceIndex, (String, PieceKind)>,
}

impl DarkChessView {
    fn empty(color: Color) -> Self {
        Self {
            color,
            visible_squares: BTreeSet::new(),
            pieces: Vec::new(),
            transcript: Vec::new(),
            opaque_ids: HashMap::new(),
        }
    }

    pub fn is_visible(&self, square: Square) -> bool {
        self.visible_squares.contains(&square)
    }
}

/// Squares `color` can currently see.
pub fn compute_visible_squares(state: &GameState, color: Color) -> BTreeSet<Square> {
    let mut visible = BTreeSet::new();
    for idx in state.pieces_on_board(color) {
        if let Some(square) = state.pieces[idx].square() {
            visible.insert(square);
        }
        visible.extend(possible_moves(state, idx, SquareMode::Visible));
    }
    if state.geometry.boards > 1 {
        let cells: Vec<Square> = visible.iter().copied().collect();
        for square in cells {
            for board in 0..state.geometry.boards {
                let mirrored = square.on_board(board);
                if state.geometry.contains(mirrored) {
                    visible.insert(mirrored);
                }
            }
        }
    }
    visible
}

fn opaque_id(rng: &mut StdRng) -> String {
    format!("{:016x}", rng.random::<u64>())
}

/// Recomputes the visible squares and pieces of `view`.
fn refresh(view: &mut DarkChessView, state: &GameState, rng: &mut StdRng) {
    let color = view.color;
    view.visible_squares = compute_visible_squares(state, color);

    let mut ids = HashMap::new();
    let mut pieces = Vec::new();
    for (idx, piece) in state.pieces.iter().enumerate() {
        let Some(square) = piece.square() else {
            continue;
        };
        let id = if piece.color == color {
            piece.id.clone()
        } else if view.visible_squares.contains(&square) {
            let id = match view.opaque_ids.get(&idx) {
                Some((id, kind)) if *kind == piece.kind => id.clone(),
                _ => opaque_id(rng),
            };
            ids.insert(idx, (id.clone(), piece.kind));
            id
        } else {
            continue;
        };
        pieces.push(VisiblePiece {
            id,
            kind: piece.kind,
            color: piece.color,
            square,
        });
    }
    view.opaque_ids = ids;
    view.pieces = pieces;
}

fn san_letter(kind: PieceKind) -> String {
    match kind {
        PieceKind::Pawn => String::new(),
        other => other.letter().to_string(),
    }
}

/// How `record` appears to a viewer who saw `before` ahead of the move and
/// sees `after` now.
fn redact(
    state: &GameState,
    record: &MoveRecord,
    before: &BTreeSet<Square>,
    after: &BTreeSet<Square>,
) -> RedactedMove {
    let seen = |square: Square| record.capture || before.contains(&square) || after.contains(&square);
    let to = seen(record.chess_move.to).then_some(record.chess_move.to);
    let (from, from_text) = match record.chess_move.from {
        MoveOrigin::Drop(_) => (None, "@".to_owned()),
        MoveOrigin::Square(square) if seen(square) => {
            (Some(square), square_to_text(&state.geometry, square))
        }
        MoveOrigin::Square(_) => (None, "?".to_owned()),
    };
    let to_text = to.map_or_else(|| "?".to_owned(), |square| square_to_text(&state.geometry, square));

    let disclosed = from.is_some() || to.is_some();
    let letter = match record.chess_move.from {
        // Drops always name the piece, pawns included.
        MoveOrigin::Drop(kind) => kind.letter().to_string(),
        MoveOrigin::Square(_) => san_letter(record.piece_kind),
    };
    let notation = format!(
        "{}{}{}{}",
        if disclosed { letter } else { String::new() },
        if disclosed || from_text != "@" { from_text } else { "?".to_owned() },
        if record.capture { "x" } else { "" },
        to_text
    );
    RedactedMove {
        color: record.color,
        from,
        to,
        capture: record.capture,
        notation,
    }
}

/// Both players' views, kept in step with the move history.
#[derive(Debug, Clone)]
pub struct DarkChessTracker {
    views: [DarkChessView; 2],
    rng: StdRng,
    snapshots: Vec<[DarkChessView; 2]>,
}

impl DarkChessTracker {
    pub fn new(state: &GameState, mut rng: StdRng) -> Self {
        let mut views = [DarkChessView::empty(Color::Light), DarkChessView::empty(Color::Dark)];
        for view in &mut views {
            refresh(view, state, &mut rng);
        }
        Self {
            views,
            rng,
            snapshots: Vec::new(),
        }
    }

    pub fn view(&self, color: Color) -> &DarkChessView {
        &self.views[color.index()]
    }

    /// Updates both views after `record` was committed to `state`.
    pub fn record_move(&mut self, state: &GameState, record: &MoveRecord) {
        self.snapshots.push(self.views.clone());
        for view in &mut self.views {
            let before = view.visible_squares.clone();
            refresh(view, state, &mut self.rng);
            let entry = if view.color == record.color {
                RedactedMove {
                    color: record.color,
                    from: record.chess_move.from_square(),
                    to: Some(record.chess_move.to),
                    capture: record.capture,
                    notation: record.san.clone(),
                }
            } else {
                redact(state, record, &before, &view.visible_squares)
            };
            trace!("{:?} sees {} as {}", view.color, record.uci, entry.notation);
            view.transcript.push(entry);
        }
    }

    pub fn undo_last_move(&mut self) {
        if let Some(previous) = self.snapshots.pop() {
            self.views = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_visible_squares, DarkChessTracker};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};
    use crate::move_generation::move_registration::register_any_move;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dark_start() -> GameState {
        GameState::from_fen(VariantSet::of(&[Variant::DarkChess]), STARTING_POSITION_FEN)
            .expect("dark chess start should parse")
    }

    fn play(state: &mut GameState, tracker: &mut DarkChessTracker, text: &str) {
        register_any_move(state, text).expect("move should register");
        let record = state.move_history.last().expect("move was recorded").clone();
        tracker.record_move(state, &record);
    }

    #[test]
    fn start_position_vision() {
        let state = dark_start();
        let visible = compute_visible_squares(&state, Color::Light);
        // Own two ranks, both push ranks, knight squares.
        assert!(visible.contains(&Square::new(0, 4, 3)));
        assert!(visible.contains(&Square::new(0, 0, 2)));
        assert!(!visible.contains(&Square::new(0, 4, 4)));
        assert_eq!(visible.len(), 32);
    }

    #[test]
    fn hidden_moves_are_fully_redacted() {
        let mut state = dark_start();
        let mut tracker = DarkChessTracker::new(&state, StdRng::seed_from_u64(7));
        play(&mut state, &mut tracker, "a2a3");
        let theirs = tracker.view(Color::Dark).transcript.last().expect("entry for black");
        assert_eq!(theirs.notation, "??");
        assert_eq!(theirs.from, None);
        let mine = tracker.view(Color::Light).transcript.last().expect("entry for white");
        assert_eq!(mine.notation, "a3");
    }

    #[test]
    fn moves_into_sight_disclose_the_destination() {
        let mut state = dark_start();
        let mut tracker = DarkChessTracker::new(&state, StdRng::seed_from_u64(7));
        play(&mut state, &mut tracker, "Nc3");
        play(&mut state, &mut tracker, "e5");
        play(&mut state, &mut tracker, "Nd5");
        let theirs = tracker.view(Color::Dark).transcript.last().expect("entry for black");
        assert_eq!(theirs.notation, "N?d5");
        assert!(tracker
            .view(Color::Dark)
            .pieces
            .iter()
            .any(|piece| piece.color == Color::Light && piece.square == Square::new(0, 3, 4)));
    }

    #[test]
    fn opaque_ids_change_when_sight_is_regained() {
        let mut state = dark_start();
        let mut tracker = DarkChessTracker::new(&state, StdRng::seed_from_u64(11));
        let id_of = |tracker: &DarkChessTracker, square: Square| {
            tracker
                .view(Color::Dark)
                .pieces
                .iter()
                .find(|piece| piece.square == square)
                .map(|piece| piece.id.clone())
        };
        play(&mut state, &mut tracker, "e4");
        play(&mut state, &mut tracker, "d5");
        let first = id_of(&tracker, Square::new(0, 4, 3)).expect("e4 pawn seen from d5");
        assert_ne!(first, state.pieces[state.piece_at(Square::new(0, 4, 3)).expect("pawn")].id);
        play(&mut state, &mut tracker, "a3");
        assert_eq!(id_of(&tracker, Square::new(0, 4, 3)), Some(first.clone()));
        play(&mut state, &mut tracker, "d4");
        assert_eq!(id_of(&tracker, Square::new(0, 4, 3)), None);
        play(&mut state, &mut tracker, "h3");
        play(&mut state, &mut tracker, "Qd5");
        let regained = id_of(&tracker, Square::new(0, 4, 3)).expect("queen sees e4 again");
        assert_ne!(regained, first);
    }

    #[test]
    fn disclosed_pawn_drops_name_the_pawn() {
        let mut state = GameState::from_fen(
            VariantSet::of(&[Variant::DarkChess, Variant::Crazyhouse]),
            "4k3/8/8/8/8/8/8/4K3/PP w - - 0 1",
        )
        .expect("dark crazyhouse position should parse");
        let mut tracker = DarkChessTracker::new(&state, StdRng::seed_from_u64(5));
        play(&mut state, &mut tracker, "P@e7");
        let theirs = tracker.view(Color::Dark).transcript.last().expect("entry for black");
        assert_eq!(theirs.notation, "P@e7");
        play(&mut state, &mut tracker, "Kf7");
        play(&mut state, &mut tracker, "P@a3");
        let hidden = tracker.view(Color::Dark).transcript.last().expect("entry for black");
        assert_eq!(hidden.notation, "??");
    }

    #[test]
    fn undo_restores_views() {
        let mut state = dark_start();
        let mut tracker = DarkChessTracker::new(&state, StdRng::seed_from_u64(3));
        let before = tracker.view(Color::Dark).clone();
        play(&mut state, &mut tracker, "e4");
        tracker.undo_last_move();
        assert_eq!(tracker.view(Color::Dark), &before);
    }
}
