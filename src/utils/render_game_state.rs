//! Terminal-oriented Unicode board renderer.
//!
//! Draws every board of the game side by side with file letters and rank
//! numbers, followed by the pockets when pockets are in use. Cells that do
//! not exist (hexagonal corners) are left blank.

use crate::game_state::chess_types::*;

/// Render the board(s) to a Unicode string for terminal output.
pub fn render_game_state(game_state: &GameState) -> String {
    let geometry = &game_state.geometry;
    let rank_width = geometry.height.to_string().len();
    let mut out = String::new();

    let files: String = (0..geometry.width)
        .map(|file| geometry.file_letter(file).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let header = (0..geometry.boards)
        .map(|_| format!("{:rank_width$} {files}", ""))
        .collect::<Vec<_>>()
        .join("    ");
    out.push_str(&header);
    out.push('\n');

    for rank in (0..geometry.height).rev() {
        let rows: Vec<String> = (0..geometry.boards)
            .map(|board| {
                let cells: Vec<String> = (0..geometry.width)
                    .map(|file| {
                        let square = Square::new(board, file, rank);
                        if !geometry.contains(square) {
                            return " ".to_owned();
                        }
                        game_state
                            .piece_at(square)
                            .map(|idx| piece_symbol(&game_state.pieces[idx]))
                            .unwrap_or('·')
                            .to_string()
                    })
                    .collect();
                format!("{:>rank_width$} {}", rank + 1, cells.join(" "))
            })
            .collect();
        out.push_str(&rows.join("    "));
        out.push('\n');
    }

    if game_state.rules.uses_pockets {
        for color in Color::ALL {
            let pocket: String = game_state
                .pocket(color)
                .map(|idx| piece_symbol(&game_state.pieces[idx]))
                .collect();
            out.push_str(&format!("{color:?} pocket: {pocket}\n"));
        }
    }
    out.push_str(&format!("{:?} to move", game_state.side_to_move));
    out
}

fn piece_symbol(piece: &Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
        // No glyphs for the compound pieces.
        (Color::Light, kind) => kind.letter(),
        (Color::Dark, kind) => kind.letter().to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::render_game_state;
    use crate::game_state::chess_rules::{HEXAGONAL_STARTING_POSITION_FEN, STARTING_POSITION_FEN};
    use crate::game_state::chess_types::*;
    use crate::game_state::variants::{Variant, VariantSet};

    #[test]
    fn orthodox_board() {
        let state = GameState::from_fen(VariantSet::empty(), STARTING_POSITION_FEN)
            .expect("start position should parse");
        let text = render_game_state(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜");
        assert_eq!(lines[5], "4 · · · · · · · ·");
        assert_eq!(lines.last().copied(), Some("Light to move"));
    }

    #[test]
    fn alice_boards_side_by_side_with_pockets() {
        let state = GameState::from_fen(
            VariantSet::of(&[Variant::AliceChess, Variant::Crazyhouse]),
            "4k3/8/8/8/8/8/8/4K3/Nq 8/8/8/8/8/8/8/R7 w - - 0 1",
        )
        .expect("alice crazyhouse position should parse");
        let text = render_game_state(&state);
        assert!(text.contains("1 · · · · ♔ · · ·    1 ♖ · · · · · · ·"));
        assert!(text.contains("Light pocket: ♘"));
        assert!(text.contains("Dark pocket: ♛"));
    }

    #[test]
    fn hexagonal_board_leaves_missing_cells_blank() {
        let state = GameState::from_fen(VariantSet::of(&[Variant::Hexagonal]), HEXAGONAL_STARTING_POSITION_FEN)
            .expect("hex start should parse");
        let text = render_game_state(&state);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "   a b c d e f g h i k l");
        assert_eq!(lines[1].trim_end(), format!("11{}♝", " ".repeat(11)));
    }
}
