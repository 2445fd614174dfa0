//! GameState-to-FEN writer, the exact inverse of `fen_parser`.

use crate::game_state::chess_rules::POCKET_ORDER;
use crate::game_state::castling::castling_plan;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_to_text;

pub fn generate_fen(game_state: &GameState) -> String {
    let mut fen = format!(
        "{} {} {}",
        position_fields(game_state),
        game_state.halfmove_clock,
        game_state.fullmove_number()
    );
    if let Some(suffix) = checks_field(game_state) {
        fen.push(' ');
        fen.push_str(&suffix);
    }
    fen
}

/// Repetition key: the FEN without the move counters.
pub fn position_key(game_state: &GameState) -> String {
    let mut key = position_fields(game_state);
    if let Some(suffix) = checks_field(game_state) {
        key.push(' ');
        key.push_str(&suffix);
    }
    key
}

fn position_fields(game_state: &GameState) -> String {
    let planes: Vec<String> = (0..game_state.geometry.boards)
        .map(|board| generate_board_field(game_state, board))
        .collect();
    format!(
        "{} {} {} {}",
        planes.join(" "),
        game_state.side_to_move.fen_char(),
        generate_castling_field(game_state),
        generate_en_passant_field(game_state)
    )
}

fn generate_board_field(game_state: &GameState, board: u8) -> String {
    let geometry = &game_state.geometry;
    let mut out = String::new();

    for rank in (0..geometry.height).rev() {
        let mut empty_count = 0u32;
        for file in 0..geometry.width {
            let square = Square::new(board, file, rank);
            if !geometry.contains(square) {
                continue;
            }
            match game_state.piece_at(square) {
                Some(idx) => {
                    if empty_count > 0 {
                        out.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    push_piece(game_state, idx, &mut out);
                }
                None => empty_count += 1,
            }
        }
        if empty_count > 0 {
            out.push_str(&empty_count.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }

    if board == 0 && game_state.rules.uses_pockets {
        out.push('/');
        for color in Color::ALL {
            for kind in POCKET_ORDER {
                for idx in game_state.pocket(color) {
                    if game_state.pieces[idx].kind == *kind {
                        out.push(piece_to_fen_char(color, *kind));
                    }
                }
            }
        }
    }
    out
}

fn push_piece(game_state: &GameState, idx: PieceIndex, out: &mut String) {
    let piece = &game_state.pieces[idx];
    out.push(piece_to_fen_char(piece.color, piece.kind));
    if game_state.rules.uses_pockets && piece.is_promoted_pawn() {
        out.push('~');
    }
    if piece.kind != PieceKind::King && piece.abilities == Some(PieceKind::King) {
        out.push('!');
    }
}

fn piece_to_fen_char(color: Color, piece: PieceKind) -> char {
    match color {
        Color::Light => piece.letter(),
        Color::Dark => piece.letter().to_ascii_lowercase(),
    }
}

/// `KQkq` when the castling rook is the outermost rook on its side, the
/// rook's file letter (Shredder style) otherwise.
fn generate_castling_field(game_state: &GameState) -> String {
    let mut out = String::new();
    for color in Color::ALL {
        for side in [CastlingSide::KingSide, CastlingSide::QueenSide] {
            let Some(plan) = castling_plan(game_state, color, side) else {
                continue;
            };
            let rook_file = plan.rook_from.file;
            let outer_rook = game_state.pieces_on_board(color).any(|idx| {
                let piece = &game_state.pieces[idx];
                piece.kind == PieceKind::Rook
                    && piece.square().is_some_and(|square| {
                        square.board == plan.rook_from.board
                            && square.rank == plan.rook_from.rank
                            && match side {
                                CastlingSide::KingSide => square.file > rook_file,
                                CastlingSide::QueenSide => square.file < rook_file,
                            }
                    })
            });
            let token = if outer_rook {
                game_state.geometry.file_letter(rook_file).to_ascii_uppercase()
            } else {
                match side {
                    CastlingSide::KingSide => 'K',
                    CastlingSide::QueenSide => 'Q',
                }
            };
            out.push(match color {
                Color::Light => token,
                Color::Dark => token.to_ascii_lowercase(),
            });
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

fn generate_en_passant_field(game_state: &GameState) -> String {
    match game_state.en_passant {
        Some(ep) => square_to_text(&game_state.geometry, ep.target),
        None => "-".to_owned(),
    }
}

fn checks_field(game_state: &GameState) -> Option<String> {
    game_state.rules.checks_to_win?;
    Some(format!(
        "+{}+{}",
        game_state.checks_given[Color::Light.index()],
        game_state.checks_given[Color::Dark.index()]
    ))
}
