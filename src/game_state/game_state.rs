//! The live position.
//!
//! `GameState` owns every piece of the game. `board` is a cache of which
//! piece stands on which cell and always agrees with `Piece::location`: a cell
//! holds index `i` exactly when `pieces[i].location` is that square. Pieces are
//! never removed from `pieces`; captured ones move to a pocket or to
//! `PieceLocation::Nowhere`, so indices and ids stay stable.

use std::collections::HashMap;

use log::trace;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board_geometry::BoardGeometry;
use crate::game_state::castling::HomePiece;
use crate::game_state::chess_rules::VariantRules;
use crate::game_state::chess_types::*;
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_outcome::{GameResult, GameStatus};
use crate::game_state::move_record::MoveRecord;
use crate::game_state::placement::{default_home_squares, default_starting_fen};
use crate::game_state::starting_data::StartingData;
use crate::game_state::variants::VariantSet;
use crate::move_generation::legal_move_checks::{is_king_in_check, royal_pieces};
use crate::move_generation::legal_move_generator::has_any_legal_move;
use crate::utils::algebraic::square_to_text;
use crate::utils::fen_generator::{generate_fen, position_key};
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone)]
pub struct GameState {
    pub variants: VariantSet,
    pub rules: VariantRules,
    pub geometry: BoardGeometry,
    pub starting_data: StartingData,

    // --- Placement ---
    /// `boards x height x width`, indexed by `BoardGeometry::cell_index`.
    pub board: Vec<Option<PieceIndex>>,
    pub pieces: Vec<Piece>,

    // --- Castling and rebirth anchors, fixed at construction ---
    pub castling_kings: [Option<HomePiece>; 2],
    pub castling_rooks: [[Option<HomePiece>; 2]; 2],
    pub circe_homes: Vec<(Color, PieceKind, Square)>,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub in_check: bool,
    pub en_passant: Option<EnPassant>,
    pub checks_given: [u8; 2],

    // --- Counters ---
    pub halfmove_clock: u32,
    /// Absolute ply index, counting plies before the starting position.
    pub ply: u32,

    // --- Transcript ---
    /// Position key (FEN without counters) to occurrence count.
    pub repetitions: HashMap<String, u8>,
    pub move_history: Vec<MoveRecord>,

    pub status: GameStatus,
    pub result: Option<GameResult>,
}

impl GameState {
    /// Builds the starting position described by `config`.
    pub fn new(config: &GameConfig) -> ChessResult<Self> {
        config.variants.ensure_valid()?;
        let geometry = BoardGeometry::from_variants(config.variants);
        let fen = match &config.fen {
            Some(fen) => fen.clone(),
            None => default_starting_fen(config.variants, &mut config.rng()),
        };
        trace!("building {} position from {fen}", config.variants);
        let data = parse_fen(config.variants, &geometry, &fen)?;
        Self::from_starting_data(config.variants, data)
    }

    #[inline]
    pub fn from_fen(variants: VariantSet, fen: &str) -> ChessResult<Self> {
        Self::new(&GameConfig::new(variants).with_fen(fen))
    }

    pub fn from_starting_data(variants: VariantSet, data: StartingData) -> ChessResult<Self> {
        variants.ensure_valid()?;
        let rules = VariantRules::from_variants(variants);
        let geometry = BoardGeometry::from_variants(variants);

        let pieces: Vec<Piece> = data
            .pieces
            .iter()
            .enumerate()
            .map(|(idx, setup)| Piece {
                id: format!("p{idx}"),
                kind: setup.kind,
                original_kind: if setup.promoted {
                    PieceKind::Pawn
                } else {
                    setup.kind
                },
                color: setup.color,
                moved: false,
                abilities: (setup.royal && setup.kind != PieceKind::King).then_some(PieceKind::King),
                location: setup.location,
            })
            .collect();

        let mut board = vec![None; geometry.cell_count()];
        for (idx, piece) in pieces.iter().enumerate() {
            let Some(square) = piece.square() else {
                continue;
            };
            if !geometry.contains(square) {
                return Err(ChessErrors::InvalidFen(format!(
                    "piece on missing square {}",
                    square_to_text(&geometry, square)
                )));
            }
            let shared = (0..geometry.boards)
                .map(|board_idx| square.on_board(board_idx))
                .any(|other| board[geometry.cell_index(other)].is_some());
            if shared {
                return Err(ChessErrors::MultiplePiecesOnSquare(square_to_text(
                    &geometry, square,
                )));
            }
            board[geometry.cell_index(square)] = Some(idx);
        }

        let mut state = Self {
            variants,
            rules,
            geometry,
            starting_data: data.clone(),
            board,
            pieces,
            castling_kings: [None; 2],
            castling_rooks: [[None; 2]; 2],
            circe_homes: Vec::new(),
            side_to_move: data.turn,
            in_check: false,
            en_passant: None,
            checks_given: data.checks_given,
            halfmove_clock: data.halfmove_clock,
            ply: data.starting_ply,
            repetitions: HashMap::new(),
            move_history: Vec::new(),
            status: GameStatus::Ongoing,
            result: None,
        };

        state.bind_castling_rights(&data)?;
        state.bind_en_passant(&data)?;
        if rules.circe {
            state.circe_homes = if rules.is_960 {
                state
                    .pieces
                    .iter()
                    .filter(|piece| piece.kind != PieceKind::Pawn)
                    .filter_map(|piece| Some((piece.color, piece.kind, piece.square()?)))
                    .collect()
            } else {
                default_home_squares(variants, &geometry)?
            };
        }

        state.validate_start()?;
        if rules.tracks_check() {
            state.in_check = is_king_in_check(&state, state.side_to_move);
        }
        state.repetitions.insert(position_key(&state), 1);
        trace!(
            "position ready: {} pieces, {} to move",
            state.pieces.len(),
            state.side_to_move.fen_char()
        );
        Ok(state)
    }

    fn bind_castling_rights(&mut self, data: &StartingData) -> ChessResult<()> {
        if !self.rules.castling_enabled {
            return Ok(());
        }
        for color in Color::ALL {
            let back_rank = self.geometry.back_rank(color);
            let king = self.pieces.iter().position(|piece| {
                piece.color == color
                    && piece.kind == PieceKind::King
                    && piece
                        .square()
                        .is_some_and(|square| square.board == 0 && square.rank == back_rank)
            });
            for side in CastlingSide::ALL {
                let Some(file) = data.castling_files[color.index()][side.index()] else {
                    continue;
                };
                let rook_square = Square::new(0, file, back_rank);
                let (Some(king), Some(rook)) = (king, self.piece_at(rook_square)) else {
                    return Err(ChessErrors::InvalidCastlingToken(self.geometry.file_letter(file)));
                };
                let king_square = self.pieces[king].square().unwrap_or(rook_square);
                self.castling_kings[color.index()] = Some(HomePiece {
                    piece: king,
                    square: king_square,
                });
                self.castling_rooks[color.index()][side.index()] = Some(HomePiece {
                    piece: rook,
                    square: rook_square,
                });
            }
        }
        Ok(())
    }

    fn bind_en_passant(&mut self, data: &StartingData) -> ChessResult<()> {
        let Some(target) = data.en_passant else {
            return Ok(());
        };
        let invalid = || ChessErrors::InvalidEnPassantSquare(square_to_text(&self.geometry, target));
        if self.piece_at(target).is_some() {
            return Err(invalid());
        }
        let pusher = self.side_to_move.opposite();
        let pawn_square = self
            .geometry
            .square_in_direction(target, self.geometry.pawn_forward(target, pusher))
            .ok_or_else(invalid)?;
        let pawn = self.piece_at(pawn_square).ok_or_else(invalid)?;
        if self.pieces[pawn].kind != PieceKind::Pawn || self.pieces[pawn].color != pusher {
            return Err(invalid());
        }
        self.en_passant = Some(EnPassant { target, pawn });
        Ok(())
    }

    fn validate_start(&mut self) -> ChessResult<()> {
        for piece in &self.pieces {
            let Some(square) = piece.square() else {
                continue;
            };
            if piece.kind != PieceKind::Pawn {
                continue;
            }
            let on_promotion = self.geometry.is_promotion_square(square, piece.color);
            let on_first_rank = self.geometry.is_first_rank(square, piece.color)
                && !(self.rules.horde && piece.color == Color::Light);
            if on_promotion || on_first_rank {
                return Err(ChessErrors::PawnOnBackRank(square_to_text(
                    &self.geometry,
                    square,
                )));
            }
        }

        if !self.rules.antichess {
            for color in Color::ALL {
                let found = royal_pieces(self, color).len();
                let expected = if self.rules.horde && color == Color::Light {
                    0
                } else {
                    1
                };
                if found != expected {
                    return Err(ChessErrors::WrongKingCount { color, found });
                }
            }
        }

        if self.rules.tracks_check()
            && !self.rules.leave_in_check_allowed
            && is_king_in_check(self, self.side_to_move.opposite())
        {
            return Err(ChessErrors::KingCapturable);
        }

        if !has_any_legal_move(self) {
            return Err(ChessErrors::NoLegalMoves);
        }
        Ok(())
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<PieceIndex> {
        if !self.geometry.contains(square) {
            return None;
        }
        self.board[self.geometry.cell_index(square)]
    }

    /// Occupant of this file/rank on any board (Alice Chess).
    pub fn piece_at_loose(&self, square: Square) -> Option<PieceIndex> {
        (0..self.geometry.boards).find_map(|board| self.piece_at(square.on_board(board)))
    }

    /// Indices of `color`'s pieces standing on a board.
    pub fn pieces_on_board(&self, color: Color) -> impl Iterator<Item = PieceIndex> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, piece)| {
                piece.color == color && matches!(piece.location, PieceLocation::Board(_))
            })
            .map(|(idx, _)| idx)
    }

    /// Indices of pieces in `color`'s pocket.
    pub fn pocket(&self, color: Color) -> impl Iterator<Item = PieceIndex> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter(move |(_, piece)| piece.location == PieceLocation::Pocket(color))
            .map(|(idx, _)| idx)
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    #[inline]
    pub fn is_ongoing(&self) -> bool {
        self.status == GameStatus::Ongoing
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }
}
