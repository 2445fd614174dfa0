//! Everything needed to start a game.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game_state::variants::VariantSet;
use crate::timing::time_control::TimeControl;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub variants: VariantSet,
    /// Starting FEN; the variant's default layout when `None`.
    pub fen: Option<String>,
    pub time_control: TimeControl,
    /// Makes the Chess960 shuffle and Dark Chess opaque ids reproducible.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(variants: VariantSet) -> Self {
        Self {
            variants,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fen(mut self, fen: impl Into<String>) -> Self {
        self.fen = Some(fen.into());
        self
    }

    #[must_use]
    pub fn with_time_control(mut self, time_control: TimeControl) -> Self {
        self.time_control = time_control;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
