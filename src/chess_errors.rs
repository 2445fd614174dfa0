//! Errors used throughout the rules engine.
//!
//! `ChessErrors` is the single error type across the crate. Variants fall in
//! three groups:
//! - construction failures (variant combination, FEN/PGN parsing, starting
//!   position invariants). No partial `GameState` is ever returned with them.
//! - move-request rejections. The position is left untouched when one of
//!   these is returned.
//! - `InternalInvariant`, which indicates a bug in the engine rather than bad
//!   input and is not meant to be recovered from.

use crate::game_state::chess_types::Color;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessErrors {
    /// Two (or more) enabled variants cannot be played together.
    #[error("Invalid variant combination: {first} cannot be combined with {second}")]
    InvalidVariantCombination { first: String, second: String },

    #[error("Unknown variant name: {0}")]
    UnknownVariant(String),

    /// FEN did not contain the expected number of whitespace separated blocks.
    #[error("Wrong FEN block count: expected {expected}, found {found}")]
    WrongBlockCount { expected: String, found: usize },

    #[error("Invalid piece literal '{0}' in FEN")]
    InvalidPieceLiteral(char),

    #[error("Invalid castling token '{0}' in FEN")]
    InvalidCastlingToken(char),

    #[error("Wrong en-passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("Non-promoted pawn on the back rank at {0}")]
    PawnOnBackRank(String),

    #[error("Multiple pieces on one square: {0}")]
    MultiplePiecesOnSquare(String),

    #[error("Wrong king count for {color:?}: {found}")]
    WrongKingCount { color: Color, found: usize },

    #[error("Starting position leaves the king of the side not to move capturable")]
    KingCapturable,

    #[error("Starting position has no legal moves for the side to move")]
    NoLegalMoves,

    /// Any other structural FEN problem (rank width, counters, ...).
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid PGN: {0}")]
    InvalidPgn(String),

    #[error("Invalid time control: {0}")]
    InvalidTimeControl(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Wrong promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("PGN move token '{0}' matches no legal move")]
    PgnMoveNotFound(String),

    #[error("PGN move token '{0}' matches more than one legal move")]
    PgnMoveAmbiguous(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid move string: {0}")]
    InvalidMoveString(String),

    #[error("Game is no longer ongoing")]
    GameFinished,

    #[error("No move to take back")]
    NothingToUndo,

    /// Engine bookkeeping went out of sync. Always a bug.
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Result type alias for rules-engine operations.
pub type ChessResult<T> = Result<T, ChessErrors>;
