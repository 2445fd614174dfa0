//! Rule constants and the per-game capability table.
//!
//! `VariantRules` is computed once from a `VariantSet` when a position is
//! built. Move generation, outcome evaluation and notation only consult these
//! booleans, never the raw flags, so each rule switch lives in one place.

use crate::game_state::chess_types::PieceKind;
use crate::game_state::variants::{Variant, VariantSet};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Alice Chess starts with the orthodox army on board 0 and an empty board 1.
pub const ALICE_STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR 8/8/8/8/8/8/8/8 w KQkq - 0 1";

pub const HORDE_STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1";

/// Glinski layout. Each rank lists only the cells that exist on that rank.
pub const HEXAGONAL_STARTING_POSITION_FEN: &str =
    "b/qbk/n1b1n/r5r/ppppppppp/11/5P5/4P1P4/3P1B1P3/2P2B2P2/1PRNQBKNRP1 w - - 0 1";

pub const CHECKS_TO_WIN: u8 = 3;
pub const FIFTY_MOVE_PLIES: u32 = 100;
pub const REPETITIONS_FOR_DRAW: u8 = 3;
/// Compensation Chess: a pawn is worth `base time / PAWNS_PER_BASE_TIME`.
pub const PAWNS_PER_BASE_TIME: i32 = 40;

const ORTHODOX_PROMOTIONS: &[PieceKind] = &[
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];
const ANTICHESS_PROMOTIONS: &[PieceKind] = &[
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::King,
];

/// Order in which pocket pieces are printed and offered as drops.
pub const POCKET_ORDER: &[PieceKind] = &[
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

/// Derived capability switches for one variant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRules {
    pub is_960: bool,
    pub uses_pockets: bool,
    /// A move may leave the mover's royal piece attacked.
    pub leave_in_check_allowed: bool,
    /// Mover must still own a royal piece after the move (Atomic).
    pub kings_must_survive: bool,
    /// Royal pieces exist and check is tracked.
    pub royal_kings: bool,
    pub captures_mandatory: bool,
    pub captures_forbidden: bool,
    pub fifty_move_rule: bool,
    pub pawn_moves_reset_fifty: bool,
    pub castling_enabled: bool,
    pub pawn_double_step: bool,
    pub retreating_pawns: bool,
    pub always_sufficient_material: bool,
    pub checks_to_win: Option<u8>,
    pub atomic: bool,
    pub absorption: bool,
    pub frankfurt: bool,
    pub circe: bool,
    pub benedict: bool,
    pub alice: bool,
    pub dark: bool,
    pub horde: bool,
    pub king_of_the_hill: bool,
    pub patrol: bool,
    pub madrasi: bool,
    pub antichess: bool,
    pub compensation: bool,
}

impl VariantRules {
    pub fn from_variants(variants: VariantSet) -> Self {
        let has = |variant| variants.contains(variant);
        let antichess = has(Variant::Antichess);
        let benedict = has(Variant::BenedictChess);
        Self {
            is_960: has(Variant::Chess960),
            uses_pockets: has(Variant::Crazyhouse),
            leave_in_check_allowed: has(Variant::Atomic)
                || antichess
                || has(Variant::DarkChess)
                || benedict,
            kings_must_survive: has(Variant::Atomic),
            royal_kings: !antichess,
            captures_mandatory: antichess,
            captures_forbidden: benedict,
            fifty_move_rule: !has(Variant::Crazyhouse),
            pawn_moves_reset_fifty: !(has(Variant::RetreatChess) || has(Variant::Circe) || benedict),
            castling_enabled: !(antichess
                || has(Variant::Hexagonal)
                || has(Variant::CircularChess)),
            pawn_double_step: !has(Variant::CircularChess),
            retreating_pawns: has(Variant::RetreatChess),
            always_sufficient_material: has(Variant::Crazyhouse)
                || has(Variant::Absorption)
                || has(Variant::Frankfurt)
                || has(Variant::KingOfTheHill)
                || has(Variant::DarkChess)
                || has(Variant::Patrol)
                || has(Variant::Horde),
            checks_to_win: has(Variant::ThreeCheck).then_some(CHECKS_TO_WIN),
            atomic: has(Variant::Atomic),
            absorption: has(Variant::Absorption),
            frankfurt: has(Variant::Frankfurt),
            circe: has(Variant::Circe),
            benedict,
            alice: has(Variant::AliceChess),
            dark: has(Variant::DarkChess),
            horde: has(Variant::Horde),
            king_of_the_hill: has(Variant::KingOfTheHill),
            patrol: has(Variant::Patrol),
            madrasi: has(Variant::Madrasi),
            antichess,
            compensation: has(Variant::Compensation),
        }
    }

    /// Check is reported, delivered and (unless waived) must be escaped.
    #[inline]
    pub fn tracks_check(&self) -> bool {
        self.royal_kings && !self.benedict
    }

    pub fn promotion_kinds(&self) -> &'static [PieceKind] {
        if self.antichess {
            ANTICHESS_PROMOTIONS
        } else {
            ORTHODOX_PROMOTIONS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VariantRules;
    use crate::game_state::variants::{Variant, VariantSet};

    #[test]
    fn crazyhouse_disables_fifty_move_rule_only() {
        let rules = VariantRules::from_variants(VariantSet::of(&[Variant::Crazyhouse]));
        assert!(!rules.fifty_move_rule);
        assert!(rules.pawn_moves_reset_fifty);
        assert!(rules.uses_pockets);
        assert!(rules.always_sufficient_material);
    }

    #[test]
    fn antichess_has_no_royalty_and_forced_captures() {
        let rules = VariantRules::from_variants(VariantSet::of(&[Variant::Antichess]));
        assert!(!rules.royal_kings);
        assert!(!rules.tracks_check());
        assert!(rules.captures_mandatory);
        assert!(!rules.castling_enabled);
        assert_eq!(rules.promotion_kinds().len(), 5);
    }
}
