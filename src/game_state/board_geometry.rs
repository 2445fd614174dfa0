//! Board shapes, coordinate systems and direction stepping.
//!
//! Every shape is stored in the same `boards x width x height` array, but
//! steps are taken in a shape-native coordinate space:
//! - rectangular (orthodox and cylinder): `(file, rank)`;
//! - hexagonal: `(file, 2 * rank + |file - 5|)`, so rook, bishop and knight
//!   steps become uniform translations on either side of the centre file;
//! - circular: `(ring, sector)`, where the 8x8 array folds into 4 rings of 16
//!   sectors and the sector coordinate wraps.
//!
//! Converting a native point back to an array square is the remap that makes
//! hex paths bend when they cross the centre file.

use crate::game_state::chess_types::{Color, Square};
use crate::game_state::variants::{Variant, VariantSet};

pub const HEX_FILE_LETTERS: &[u8] = b"abcdefghikl";
pub const FILE_LETTERS: &[u8] = b"abcdefghijklmnop";

const HEX_SIZE: u8 = 11;
const HEX_CENTRE_FILE: i32 = 5;
const RING_COUNT: i32 = 4;
const SECTOR_COUNT: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardShape {
    Rectangular,
    Hexagonal,
    Circular,
}

/// Increment in native coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub dx: i8,
    pub dy: i8,
}

const fn s(dx: i8, dy: i8) -> Step {
    Step { dx, dy }
}

const RECT_ROOK: &[Step] = &[s(1, 0), s(-1, 0), s(0, 1), s(0, -1)];
const RECT_BISHOP: &[Step] = &[s(1, 1), s(1, -1), s(-1, 1), s(-1, -1)];
const RECT_KNIGHT: &[Step] = &[
    s(1, 2),
    s(2, 1),
    s(2, -1),
    s(1, -2),
    s(-1, -2),
    s(-2, -1),
    s(-2, 1),
    s(-1, 2),
];
const RECT_KING: &[Step] = &[
    s(1, 0),
    s(-1, 0),
    s(0, 1),
    s(0, -1),
    s(1, 1),
    s(1, -1),
    s(-1, 1),
    s(-1, -1),
];

const HEX_ROOK: &[Step] = &[s(0, 2), s(0, -2), s(1, 1), s(1, -1), s(-1, 1), s(-1, -1)];
const HEX_BISHOP: &[Step] = &[s(1, 3), s(1, -3), s(-1, 3), s(-1, -3), s(2, 0), s(-2, 0)];
const HEX_KNIGHT: &[Step] = &[
    s(1, 5),
    s(1, -5),
    s(-1, 5),
    s(-1, -5),
    s(2, 4),
    s(2, -4),
    s(-2, 4),
    s(-2, -4),
    s(3, 1),
    s(3, -1),
    s(-3, 1),
    s(-3, -1),
];
const HEX_KING: &[Step] = &[
    s(0, 2),
    s(0, -2),
    s(1, 1),
    s(1, -1),
    s(-1, 1),
    s(-1, -1),
    s(1, 3),
    s(1, -3),
    s(-1, 3),
    s(-1, -3),
    s(2, 0),
    s(-2, 0),
];

/// Dimensions and stepping rules for one variant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub boards: u8,
    pub width: u8,
    pub height: u8,
    pub shape: BoardShape,
    pub wraps_files: bool,
}

impl BoardGeometry {
    pub fn from_variants(variants: VariantSet) -> Self {
        let boards = if variants.contains(Variant::AliceChess) { 2 } else { 1 };
        let (width, height, shape) = if variants.contains(Variant::Hexagonal) {
            (HEX_SIZE, HEX_SIZE, BoardShape::Hexagonal)
        } else if variants.contains(Variant::CircularChess) {
            (8, 8, BoardShape::Circular)
        } else {
            (8, 8, BoardShape::Rectangular)
        };
        Self {
            boards,
            width,
            height,
            shape,
            wraps_files: variants.contains(Variant::Cylinder),
        }
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.boards as usize * self.width as usize * self.height as usize
    }

    #[inline]
    pub fn cell_index(&self, square: Square) -> usize {
        (square.board as usize * self.height as usize + square.rank as usize) * self.width as usize
            + square.file as usize
    }

    /// Number of cells in a file, counted from rank 0.
    pub fn file_length(&self, file: u8) -> u8 {
        match self.shape {
            BoardShape::Hexagonal => HEX_SIZE - (file as i32 - HEX_CENTRE_FILE).unsigned_abs() as u8,
            _ => self.height,
        }
    }

    /// Square exists (the hexagonal board's cut corners do not).
    pub fn contains(&self, square: Square) -> bool {
        square.board < self.boards
            && square.file < self.width
            && square.rank < self.file_length(square.file)
    }

    /// Array cell that can never hold a piece.
    pub fn is_void(&self, file: u8, rank: u8) -> bool {
        file < self.width && rank < self.height && rank >= self.file_length(file)
    }

    pub fn file_letter(&self, file: u8) -> char {
        let letters = match self.shape {
            BoardShape::Hexagonal => HEX_FILE_LETTERS,
            _ => FILE_LETTERS,
        };
        letters.get(file as usize).map(|b| *b as char).unwrap_or('?')
    }

    pub fn file_from_letter(&self, letter: char) -> Option<u8> {
        let letters = match self.shape {
            BoardShape::Hexagonal => HEX_FILE_LETTERS,
            _ => FILE_LETTERS,
        };
        letters
            .iter()
            .take(self.width as usize)
            .position(|b| *b as char == letter)
            .map(|idx| idx as u8)
    }

    /// Wraps a file around the width on a cylinder; otherwise range checks it.
    pub fn adjust_file(&self, file: i32) -> Option<u8> {
        if self.wraps_files {
            Some(file.rem_euclid(self.width as i32) as u8)
        } else if (0..self.width as i32).contains(&file) {
            Some(file as u8)
        } else {
            None
        }
    }

    /// Wraps the sector coordinate around the ring on the circular board.
    pub fn adjust_rank(&self, rank: i32) -> Option<i32> {
        match self.shape {
            BoardShape::Circular => Some(rank.rem_euclid(SECTOR_COUNT)),
            _ if (0..self.height as i32).contains(&rank) => Some(rank),
            _ => None,
        }
    }

    /// Array square to native coordinates.
    pub fn to_native(&self, square: Square) -> (i32, i32) {
        let file = square.file as i32;
        let rank = square.rank as i32;
        match self.shape {
            BoardShape::Rectangular => (file, rank),
            BoardShape::Hexagonal => (file, 2 * rank + (file - HEX_CENTRE_FILE).abs()),
            BoardShape::Circular => {
                if file < RING_COUNT {
                    (file, rank)
                } else {
                    (2 * RING_COUNT - 1 - file, SECTOR_COUNT - 1 - rank)
                }
            }
        }
    }

    /// Native coordinates back to an array square, if one exists there.
    pub fn from_native(&self, board: u8, x: i32, y: i32) -> Option<Square> {
        let (file, rank) = match self.shape {
            BoardShape::Rectangular => (self.adjust_file(x)? as i32, y),
            BoardShape::Hexagonal => {
                let offset = (x - HEX_CENTRE_FILE).abs();
                if (y - offset).rem_euclid(2) != 0 {
                    return None;
                }
                (x, (y - offset) / 2)
            }
            BoardShape::Circular => {
                if !(0..RING_COUNT).contains(&x) {
                    return None;
                }
                let sector = self.adjust_rank(y)?;
                if sector < SECTOR_COUNT / 2 {
                    (x, sector)
                } else {
                    (2 * RING_COUNT - 1 - x, SECTOR_COUNT - 1 - sector)
                }
            }
        };
        if file < 0 || rank < 0 || file >= self.width as i32 || rank >= self.height as i32 {
            return None;
        }
        let square = Square::new(board, file as u8, rank as u8);
        self.contains(square).then_some(square)
    }

    pub fn square_in_direction(&self, square: Square, step: Step) -> Option<Square> {
        let (x, y) = self.to_native(square);
        self.from_native(square.board, x + step.dx as i32, y + step.dy as i32)
    }

    /// Lazy walk from `start` (exclusive) along `step`, ending off-board or
    /// when the walk comes back to `start`.
    pub fn traverse(&self, start: Square, step: Step) -> Traversal {
        Traversal {
            geometry: *self,
            start,
            current: start,
            step,
            remaining: self.cell_count(),
        }
    }

    pub fn rook_steps(&self) -> &'static [Step] {
        match self.shape {
            BoardShape::Hexagonal => HEX_ROOK,
            _ => RECT_ROOK,
        }
    }

    pub fn bishop_steps(&self) -> &'static [Step] {
        match self.shape {
            BoardShape::Hexagonal => HEX_BISHOP,
            _ => RECT_BISHOP,
        }
    }

    pub fn knight_steps(&self) -> &'static [Step] {
        match self.shape {
            BoardShape::Hexagonal => HEX_KNIGHT,
            _ => RECT_KNIGHT,
        }
    }

    pub fn king_steps(&self) -> &'static [Step] {
        match self.shape {
            BoardShape::Hexagonal => HEX_KING,
            _ => RECT_KING,
        }
    }

    /// Native forward step of a pawn standing on `square`.
    pub fn pawn_forward(&self, square: Square, color: Color) -> Step {
        let sign: i8 = if color == Color::Light { 1 } else { -1 };
        match self.shape {
            BoardShape::Rectangular => s(0, sign),
            BoardShape::Hexagonal => s(0, 2 * sign),
            BoardShape::Circular => {
                // Array rank grows with the sector on files a-d, shrinks on e-h.
                let (_, sector) = self.to_native(square);
                let half = if sector < SECTOR_COUNT / 2 { 1 } else { -1 };
                s(0, sign * half)
            }
        }
    }

    pub fn pawn_captures(&self, square: Square, color: Color) -> [Step; 2] {
        let forward = self.pawn_forward(square, color);
        match self.shape {
            BoardShape::Hexagonal => [s(1, forward.dy / 2), s(-1, forward.dy / 2)],
            _ => [s(1, forward.dy), s(-1, forward.dy)],
        }
    }

    /// Squares from which an unmoved pawn may advance two steps.
    pub fn is_pawn_start(&self, square: Square, color: Color) -> bool {
        match self.shape {
            BoardShape::Rectangular => match color {
                Color::Light => square.rank == 1,
                Color::Dark => square.rank + 2 == self.height,
            },
            BoardShape::Hexagonal => {
                let offset = (square.file as i32 - HEX_CENTRE_FILE).abs();
                if offset > 4 {
                    return false;
                }
                match color {
                    Color::Light => square.rank as i32 == 4 - offset,
                    Color::Dark => square.rank == 6,
                }
            }
            BoardShape::Circular => false,
        }
    }

    pub fn is_promotion_square(&self, square: Square, color: Color) -> bool {
        match color {
            Color::Light => square.rank + 1 == self.file_length(square.file),
            Color::Dark => square.rank == 0,
        }
    }

    /// Rank (file-relative) on which `color`'s pieces start. Same as the
    /// opponent's promotion squares.
    #[inline]
    pub fn is_first_rank(&self, square: Square, color: Color) -> bool {
        self.is_promotion_square(square, color.opposite())
    }

    /// Rank index of `color`'s back rank on rectangular boards.
    #[inline]
    pub fn back_rank(&self, color: Color) -> u8 {
        match color {
            Color::Light => 0,
            Color::Dark => self.height - 1,
        }
    }

    /// Square colour class. Two classes on rectangular and circular boards,
    /// three on the hexagonal board.
    pub fn square_color(&self, square: Square) -> u8 {
        let (x, y) = self.to_native(square);
        match self.shape {
            BoardShape::Hexagonal => y.rem_euclid(3) as u8,
            _ => (x + y).rem_euclid(2) as u8,
        }
    }

    /// King of the Hill target squares (board independent).
    pub fn is_centre_square(&self, square: Square) -> bool {
        match self.shape {
            BoardShape::Hexagonal => {
                square.file as i32 == HEX_CENTRE_FILE && square.rank as i32 == HEX_CENTRE_FILE
            }
            _ => {
                let file_mid = self.width / 2;
                let rank_mid = self.height / 2;
                (file_mid - 1..=file_mid).contains(&square.file)
                    && (rank_mid - 1..=rank_mid).contains(&square.rank)
            }
        }
    }

    /// Squares one king step away from `square` on the same board.
    pub fn neighbourhood(&self, square: Square) -> Vec<Square> {
        self.king_steps()
            .iter()
            .filter_map(|step| self.square_in_direction(square, *step))
            .filter(|neighbour| *neighbour != square)
            .collect()
    }

    /// Every existing square, board by board, rank-major from rank 0.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.boards).flat_map(move |board| {
            (0..self.height).flat_map(move |rank| {
                (0..self.width)
                    .map(move |file| Square::new(board, file, rank))
                    .filter(move |square| self.contains(*square))
            })
        })
    }

    /// Next board in Alice Chess order.
    #[inline]
    pub fn next_board(&self, board: u8) -> u8 {
        (board + 1) % self.boards
    }
}

/// Iterator returned by [`BoardGeometry::traverse`].
#[derive(Debug, Clone)]
pub struct Traversal {
    geometry: BoardGeometry,
    start: Square,
    current: Square,
    step: Step,
    remaining: usize,
}

impl Iterator for Traversal {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.remaining == 0 {
            return None;
        }
        let next = self.geometry.square_in_direction(self.current, self.step)?;
        if next == self.start {
            self.remaining = 0;
            return None;
        }
        self.remaining -= 1;
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardGeometry, Step};
    use crate::game_state::chess_types::{Color, Square};
    use crate::game_state::variants::{Variant, VariantSet};

    fn geometry(variants: &[Variant]) -> BoardGeometry {
        BoardGeometry::from_variants(VariantSet::of(variants))
    }

    #[test]
    fn rook_ray_on_orthodox_board_stops_at_edge() {
        let g = geometry(&[]);
        let ray: Vec<Square> = g.traverse(Square::new(0, 0, 0), Step { dx: 1, dy: 0 }).collect();
        assert_eq!(ray.len(), 7);
        assert_eq!(ray.last(), Some(&Square::new(0, 7, 0)));
    }

    #[test]
    fn cylinder_ray_wraps_and_stops_before_start() {
        let g = geometry(&[Variant::Cylinder]);
        let ray: Vec<Square> = g.traverse(Square::new(0, 3, 2), Step { dx: 1, dy: 0 }).collect();
        assert_eq!(ray.len(), 7);
        assert!(ray.contains(&Square::new(0, 0, 2)));
        assert!(!ray.contains(&Square::new(0, 3, 2)));
    }

    #[test]
    fn hexagonal_board_has_91_cells() {
        let g = geometry(&[Variant::Hexagonal]);
        assert_eq!(g.squares().count(), 91);
        assert!(g.is_void(0, 6));
        assert!(!g.contains(Square::new(0, 0, 6)));
        assert!(g.contains(Square::new(0, 5, 10)));
    }

    #[test]
    fn hexagonal_file_step_bends_at_centre() {
        let g = geometry(&[Variant::Hexagonal]);
        // Rook step (1, 1) from e1 climbs to f2, then stays on rank 2 at g2.
        let ray: Vec<Square> = g
            .traverse(Square::new(0, 4, 0), Step { dx: 1, dy: 1 })
            .take(2)
            .collect();
        assert_eq!(ray, vec![Square::new(0, 5, 1), Square::new(0, 6, 1)]);
        let bent: Vec<Square> = g
            .traverse(Square::new(0, 3, 0), Step { dx: 1, dy: -1 })
            .collect();
        assert_eq!(bent, vec![Square::new(0, 4, 0), Square::new(0, 5, 0)]);
    }

    #[test]
    fn hexagonal_bishops_start_on_three_colours() {
        let g = geometry(&[Variant::Hexagonal]);
        let mut colours: Vec<u8> = (0..3).map(|rank| g.square_color(Square::new(0, 5, rank))).collect();
        colours.sort_unstable();
        assert_eq!(colours, vec![0, 1, 2]);
    }

    #[test]
    fn circular_sector_walk_returns_to_start() {
        let g = geometry(&[Variant::CircularChess]);
        let start = Square::new(0, 0, 0);
        let ring: Vec<Square> = g.traverse(start, Step { dx: 0, dy: 1 }).collect();
        assert_eq!(ring.len(), 15);
        assert!(ring.contains(&Square::new(0, 7, 7)));
        assert!(ring.contains(&Square::new(0, 7, 0)));
    }

    #[test]
    fn circular_pawns_advance_towards_promotion_on_both_halves() {
        let g = geometry(&[Variant::CircularChess]);
        let left = Square::new(0, 1, 1);
        let right = Square::new(0, 6, 1);
        assert_eq!(
            g.square_in_direction(left, g.pawn_forward(left, Color::Light)),
            Some(Square::new(0, 1, 2))
        );
        assert_eq!(
            g.square_in_direction(right, g.pawn_forward(right, Color::Light)),
            Some(Square::new(0, 6, 2))
        );
    }
}
