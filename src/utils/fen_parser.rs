//! FEN-to-StartingData parser.
//!
//! Reads the extended FEN used by every variant: one placement plane per
//! board (space separated), an optional pocket plane appended to board 0 as
//! one more `/` rank, turn, castling (`KQkq` or Shredder file letters),
//! en-passant square, both counters and the optional `+w+b` Three-check
//! suffix. Hexagonal ranks list only the cells that exist on that rank.

use log::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board_geometry::BoardGeometry;
use crate::game_state::castling::{discover_castling_file, rook_on_back_rank};
use crate::game_state::chess_rules::VariantRules;
use crate::game_state::chess_types::*;
use crate::game_state::starting_data::{PieceSetup, StartingData};
use crate::game_state::variants::VariantSet;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(variants: VariantSet, geometry: &BoardGeometry, fen: &str) -> ChessResult<StartingData> {
    let rules = VariantRules::from_variants(variants);
    let blocks: Vec<&str> = fen.split_whitespace().collect();
    let boards = geometry.boards as usize;
    let base = boards + 5;
    if blocks.len() != base && blocks.len() != base + 1 {
        return Err(ChessErrors::WrongBlockCount {
            expected: format!("{base} or {}", base + 1),
            found: blocks.len(),
        });
    }

    let mut pieces = Vec::new();
    for (board, plane) in blocks.iter().take(boards).enumerate() {
        let board = u8::try_from(board).map_err(|_| ChessErrors::InvalidFen(fen.to_owned()))?;
        parse_plane(geometry, board, plane, rules.uses_pockets && board == 0, &mut pieces)?;
    }

    let turn = parse_turn(blocks[boards])?;
    let castling_files = parse_castling(geometry, &pieces, blocks[boards + 1])?;
    let en_passant = parse_en_passant(geometry, blocks[boards + 2])?;
    let halfmove_clock: u32 = blocks[boards + 3]
        .parse()
        .map_err(|_| ChessErrors::InvalidFen(format!("invalid halfmove clock {}", blocks[boards + 3])))?;
    let fullmove_number: u32 = blocks[boards + 4]
        .parse()
        .map_err(|_| ChessErrors::InvalidFen(format!("invalid fullmove number {}", blocks[boards + 4])))?;
    let checks_given = match blocks.get(boards + 5) {
        Some(token) => parse_checks(token)?,
        None => [0, 0],
    };

    let starting_ply = fullmove_number.max(1).saturating_sub(1) * 2 + u32::from(turn == Color::Dark);
    Ok(StartingData {
        turn,
        starting_ply,
        castling_files,
        en_passant,
        checks_given,
        halfmove_clock,
        pieces,
    })
}

/// Decodes one piece literal, with its optional `~` / `!` markers.
fn piece_from_literal(ch: char) -> ChessResult<(PieceKind, Color)> {
    let kind = PieceKind::from_letter(ch).ok_or(ChessErrors::InvalidPieceLiteral(ch))?;
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };
    Ok((kind, color))
}

fn parse_plane(
    geometry: &BoardGeometry,
    board: u8,
    plane: &str,
    with_pocket: bool,
    pieces: &mut Vec<PieceSetup>,
) -> ChessResult<()> {
    let rows: Vec<&str> = plane.split('/').collect();
    let height = geometry.height as usize;
    let has_pocket_row = with_pocket && rows.len() == height + 1;
    if rows.len() != height && !has_pocket_row {
        return Err(ChessErrors::InvalidFen(format!(
            "board {board} has {} ranks, expected {height}",
            rows.len()
        )));
    }

    for (row_idx, row) in rows.iter().take(height).enumerate() {
        let rank = (height - 1 - row_idx) as u8;
        let files: Vec<u8> = (0..geometry.width)
            .filter(|file| geometry.contains(Square::new(board, *file, rank)))
            .collect();
        let mut cursor = 0usize;
        let mut chars = row.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch.is_ascii_digit() {
                let mut count = ch.to_digit(10).unwrap_or(0) as usize;
                while let Some(next) = chars.peek().and_then(|next| next.to_digit(10)) {
                    count = count * 10 + next as usize;
                    chars.next();
                }
                if count == 0 {
                    return Err(ChessErrors::InvalidFen(format!("zero empty count in rank {row}")));
                }
                cursor += count;
                continue;
            }
            let (kind, color) = piece_from_literal(ch)?;
            let mut setup = PieceSetup {
                kind,
                color,
                promoted: false,
                royal: false,
                location: PieceLocation::Nowhere,
            };
            while let Some(marker) = chars.peek().copied() {
                match marker {
                    '~' => setup.promoted = true,
                    '!' => setup.royal = true,
                    _ => break,
                }
                chars.next();
            }
            let file = *files.get(cursor).ok_or_else(|| {
                ChessErrors::InvalidFen(format!("rank {row} has more than {} cells", files.len()))
            })?;
            setup.location = PieceLocation::Board(Square::new(board, file, rank));
            pieces.push(setup);
            cursor += 1;
        }
        if cursor != files.len() {
            return Err(ChessErrors::InvalidFen(format!(
                "rank {row} covers {cursor} cells, expected {}",
                files.len()
            )));
        }
    }

    if has_pocket_row {
        for ch in rows[height].chars() {
            let (kind, color) = piece_from_literal(ch)?;
            pieces.push(PieceSetup {
                kind,
                color,
                promoted: false,
                royal: false,
                location: PieceLocation::Pocket(color),
            });
        }
    }
    Ok(())
}

fn parse_turn(token: &str) -> ChessResult<Color> {
    match token {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        other => Err(ChessErrors::InvalidFen(format!("invalid side to move {other}"))),
    }
}

fn parse_castling(
    geometry: &BoardGeometry,
    pieces: &[PieceSetup],
    token: &str,
) -> ChessResult<[[Option<u8>; 2]; 2]> {
    let mut files = [[None; 2]; 2];
    if token == "-" {
        return Ok(files);
    }
    for ch in token.chars() {
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        let (side, file) = match ch.to_ascii_lowercase() {
            'k' => (
                CastlingSide::KingSide,
                discover_castling_file(geometry, pieces, color, CastlingSide::KingSide),
            ),
            'q' => (
                CastlingSide::QueenSide,
                discover_castling_file(geometry, pieces, color, CastlingSide::QueenSide),
            ),
            letter => {
                let file = geometry
                    .file_from_letter(letter)
                    .ok_or(ChessErrors::InvalidCastlingToken(ch))?;
                let side = rook_on_back_rank(geometry, pieces, color, file)
                    .ok_or(ChessErrors::InvalidCastlingToken(ch))?;
                (side, Some(file))
            }
        };
        let file = file.ok_or(ChessErrors::InvalidCastlingToken(ch))?;
        let slot = &mut files[color.index()][side.index()];
        if slot.is_some() {
            return Err(ChessErrors::InvalidCastlingToken(ch));
        }
        *slot = Some(file);
        debug!("castling right {ch} bound to rook file {}", geometry.file_letter(file));
    }
    Ok(files)
}

fn parse_en_passant(geometry: &BoardGeometry, token: &str) -> ChessResult<Option<Square>> {
    if token == "-" {
        return Ok(None);
    }
    algebraic_to_square(geometry, token)
        .map(Some)
        .map_err(|_| ChessErrors::InvalidEnPassantSquare(token.to_owned()))
}

/// `+W+B`: checks already delivered by white and black.
fn parse_checks(token: &str) -> ChessResult<[u8; 2]> {
    let invalid = || ChessErrors::InvalidFen(format!("invalid checks suffix {token}"));
    let mut parts = token.strip_prefix('+').ok_or_else(invalid)?.split('+');
    let light: u8 = parts.next().and_then(|part| part.parse().ok()).ok_or_else(invalid)?;
    let dark: u8 = parts.next().and_then(|part| part.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok([light, dark])
}
