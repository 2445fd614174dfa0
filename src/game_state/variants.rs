//! Variant flags and the combinability matrix.
//!
//! `VariantSet` is a small immutable bitset. Construction of a game rejects
//! any set for which [`VariantSet::first_conflict`] reports a pair.

use std::fmt;

use crate::chess_errors::{ChessErrors, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Chess960,
    Crazyhouse,
    Atomic,
    Circe,
    AliceChess,
    DarkChess,
    Hexagonal,
    CircularChess,
    Cylinder,
    Absorption,
    Frankfurt,
    ThreeCheck,
    Antichess,
    BenedictChess,
    Horde,
    KingOfTheHill,
    Patrol,
    Madrasi,
    Compensation,
    RetreatChess,
}

impl Variant {
    pub const ALL: [Variant; 20] = [
        Variant::Chess960,
        Variant::Crazyhouse,
        Variant::Atomic,
        Variant::Circe,
        Variant::AliceChess,
        Variant::DarkChess,
        Variant::Hexagonal,
        Variant::CircularChess,
        Variant::Cylinder,
        Variant::Absorption,
        Variant::Frankfurt,
        Variant::ThreeCheck,
        Variant::Antichess,
        Variant::BenedictChess,
        Variant::Horde,
        Variant::KingOfTheHill,
        Variant::Patrol,
        Variant::Madrasi,
        Variant::Compensation,
        Variant::RetreatChess,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Variant::Chess960 => "Chess960",
            Variant::Crazyhouse => "Crazyhouse",
            Variant::Atomic => "Atomic",
            Variant::Circe => "Circe",
            Variant::AliceChess => "AliceChess",
            Variant::DarkChess => "DarkChess",
            Variant::Hexagonal => "Hexagonal",
            Variant::CircularChess => "CircularChess",
            Variant::Cylinder => "Cylinder",
            Variant::Absorption => "Absorption",
            Variant::Frankfurt => "Frankfurt",
            Variant::ThreeCheck => "ThreeCheck",
            Variant::Antichess => "Antichess",
            Variant::BenedictChess => "BenedictChess",
            Variant::Horde => "Horde",
            Variant::KingOfTheHill => "KingOfTheHill",
            Variant::Patrol => "Patrol",
            Variant::Madrasi => "Madrasi",
            Variant::Compensation => "Compensation",
            Variant::RetreatChess => "RetreatChess",
        }
    }

    /// Case-insensitive lookup; dashes and underscores are ignored so
    /// `three-check` and `King_of_the_Hill` resolve too.
    pub fn from_name(name: &str) -> Option<Variant> {
        let normalized: String = name
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().to_ascii_lowercase() == normalized)
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pairs that cannot be enabled together. Symmetric.
const INCOMPATIBLE: &[(Variant, &[Variant])] = &[
    (
        Variant::Horde,
        &[
            Variant::Atomic,
            Variant::DarkChess,
            Variant::Antichess,
            Variant::Crazyhouse,
            Variant::ThreeCheck,
            Variant::Hexagonal,
            Variant::Compensation,
        ],
    ),
    (
        Variant::Antichess,
        &[
            Variant::Crazyhouse,
            Variant::Circe,
            Variant::Patrol,
            Variant::Madrasi,
            Variant::ThreeCheck,
            Variant::Compensation,
            Variant::Absorption,
            Variant::KingOfTheHill,
            Variant::BenedictChess,
            Variant::Frankfurt,
        ],
    ),
    (
        Variant::CircularChess,
        &[
            Variant::Cylinder,
            Variant::KingOfTheHill,
            Variant::Hexagonal,
            Variant::Chess960,
            // Rebirth squares are not defined on the ring.
            Variant::Circe,
        ],
    ),
    (Variant::Hexagonal, &[Variant::Chess960, Variant::Cylinder]),
    (
        Variant::BenedictChess,
        &[
            Variant::Atomic,
            Variant::Crazyhouse,
            Variant::Circe,
            Variant::Absorption,
            Variant::Frankfurt,
            Variant::ThreeCheck,
            Variant::Patrol,
            Variant::Madrasi,
            Variant::Compensation,
        ],
    ),
    (
        Variant::Atomic,
        &[Variant::Absorption, Variant::Frankfurt, Variant::Circe],
    ),
    (
        Variant::Absorption,
        &[Variant::Frankfurt],
    ),
    (Variant::DarkChess, &[Variant::ThreeCheck]),
    // Pocket reversion of swapped abilities is undefined.
    (Variant::Frankfurt, &[Variant::Crazyhouse]),
];

/// Immutable set of enabled variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VariantSet(u32);

impl VariantSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(variants: &[Variant]) -> Self {
        variants
            .iter()
            .fold(Self::empty(), |set, variant| set.with(*variant))
    }

    #[must_use]
    pub const fn with(self, variant: Variant) -> Self {
        Self(self.0 | variant.bit())
    }

    #[inline]
    pub const fn contains(self, variant: Variant) -> bool {
        self.0 & variant.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Variant> {
        Variant::ALL
            .into_iter()
            .filter(move |variant| self.contains(*variant))
    }

    /// First incompatible pair found, in table order.
    pub fn first_conflict(self) -> Option<(Variant, Variant)> {
        INCOMPATIBLE.iter().find_map(|(first, others)| {
            if !self.contains(*first) {
                return None;
            }
            others
                .iter()
                .find(|other| self.contains(**other))
                .map(|other| (*first, *other))
        })
    }

    /// Pure combinability predicate.
    pub fn validate(self) -> bool {
        self.first_conflict().is_none()
    }

    pub fn ensure_valid(self) -> ChessResult<()> {
        match self.first_conflict() {
            Some((first, second)) => Err(ChessErrors::InvalidVariantCombination {
                first: first.name().to_owned(),
                second: second.name().to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Parses a PGN `Variant` tag value. Names are separated by spaces or
    /// `+`; `Standard` and the empty string mean no variant.
    pub fn parse(text: &str) -> ChessResult<Self> {
        let mut set = Self::empty();
        for token in text
            .split(|ch: char| ch == '+' || ch.is_whitespace() || ch == ',')
            .filter(|token| !token.is_empty())
        {
            if token.eq_ignore_ascii_case("standard") {
                continue;
            }
            let variant =
                Variant::from_name(token).ok_or_else(|| ChessErrors::UnknownVariant(token.to_owned()))?;
            set = set.with(variant);
        }
        Ok(set)
    }

    /// PGN `Variant` tag value.
    pub fn pgn_name(self) -> String {
        if self.is_empty() {
            return "Standard".to_owned();
        }
        self.iter().map(Variant::name).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pgn_name())
    }
}

impl FromIterator<Variant> for VariantSet {
    fn from_iter<T: IntoIterator<Item = Variant>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), |set, variant| set.with(variant))
    }
}

#[cfg(test)]
mod tests {
    use super::{Variant, VariantSet};
    use crate::chess_errors::ChessErrors;

    #[test]
    fn incompatible_pairs_are_rejected_in_both_orders() {
        let a = VariantSet::of(&[Variant::Horde, Variant::Atomic]);
        let b = VariantSet::of(&[Variant::Atomic, Variant::Horde]);
        assert!(!a.validate());
        assert!(!b.validate());
        assert!(matches!(
            b.ensure_valid(),
            Err(ChessErrors::InvalidVariantCombination { .. })
        ));
    }

    #[test]
    fn compatible_sets_pass() {
        let set = VariantSet::of(&[Variant::Chess960, Variant::Crazyhouse, Variant::AliceChess]);
        assert!(set.validate());
        assert!(VariantSet::empty().validate());
    }

    #[test]
    fn tag_value_round_trips() {
        let set = VariantSet::parse("Atomic+Chess960").expect("tag should parse");
        assert!(set.contains(Variant::Atomic));
        assert!(set.contains(Variant::Chess960));
        assert_eq!(set.pgn_name(), "Chess960 Atomic");
        assert_eq!(
            VariantSet::parse(&set.pgn_name()).expect("printed tag should parse"),
            set
        );
        assert_eq!(
            VariantSet::parse("Standard").expect("standard should parse"),
            VariantSet::empty()
        );
    }

    #[test]
    fn unknown_names_are_reported() {
        assert_eq!(
            VariantSet::parse("Atomic Chaturanga"),
            Err(ChessErrors::UnknownVariant("Chaturanga".to_owned()))
        );
    }
}
