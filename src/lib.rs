//! Crate root module declarations for the variant chess rules engine.
//!
//! This file exposes all subsystems (game state, move generation, notation,
//! Dark Chess visibility, clocks and the game facade) so the binary, benches
//! and the surrounding server can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod board_geometry;
    pub mod castling;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_config;
    pub mod game_outcome;
    pub mod game_state;
    pub mod move_record;
    pub mod placement;
    pub mod starting_data;
    pub mod undo_state;
    pub mod variants;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod drop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod rook_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod move_generator;
    pub mod move_registration;
    pub mod perft;
    pub mod variant_effects;
}

pub mod visibility {
    pub mod dark_chess;
}

pub mod timing {
    pub mod game_clock;
    pub mod time_control;
}

pub mod game {
    pub mod game_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod standard_algebraic;
}

pub use chess_errors::{ChessErrors, ChessResult};
pub use game::game_session::Game;
pub use game_state::game_config::GameConfig;
pub use game_state::variants::{Variant, VariantSet};
