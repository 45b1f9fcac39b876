use std::fmt;

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::Point;
use crate::colour::Colour;
use crate::coord;
use crate::props::Properties;

/// Largest side length an SGF record can describe.
pub const MAX_SIZE: u8 = 52;
pub const DEFAULT_SIZE: u8 = 19;

/// A square Go board stored as a flat array, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    cells: Vec<Colour>,
    size: u8,
}

impl Board {
    /// An empty board.
    pub fn new(size: u8) -> Self {
        Board {
            cells: vec![Colour::Empty; size as usize * size as usize],
            size,
        }
    }

    /// Derive a node's board from its parent's board and the node's own properties.
    ///
    /// Setup stones go down first (`AB`, `AW`, then `AE`), then every on-board
    /// `B` move and every on-board `W` move is played with captures resolved.
    /// Pass-shaped and off-board values are skipped.
    pub(crate) fn derive(parent: Option<&Board>, size: u8, props: &Properties) -> Self {
        let mut board = match parent {
            Some(b) => b.clone(),
            None => Board::new(size),
        };
        debug_assert_eq!(board.size, size, "parent board has a different size");

        for (key, colour) in [
            ("AB", Colour::Black),
            ("AW", Colour::White),
            ("AE", Colour::Empty),
        ] {
            for value in props.raw(key) {
                if let Some(point) = coord::point_from_sgf(value, size) {
                    board.set(point, colour);
                }
            }
        }

        for (key, colour) in [("B", Colour::Black), ("W", Colour::White)] {
            for value in props.raw(key) {
                if let Some(point) = coord::point_from_sgf(value, size) {
                    board.play(colour, point);
                }
            }
        }

        board
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn cells(&self) -> &[Colour] {
        &self.cells
    }

    /// Colour at a point. Off-board points read as Empty.
    pub fn get(&self, point: Point) -> Colour {
        if self.on_board(point) {
            self.cells[self.idx(point)]
        } else {
            Colour::Empty
        }
    }

    pub fn on_board(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == Colour::Empty)
    }

    pub fn count(&self, colour: Colour) -> usize {
        self.cells.iter().filter(|&&c| c == colour).count()
    }

    // -- Graph algorithms --

    /// The 4-connected neighbours that are on the board.
    pub fn neighbours(&self, (x, y): Point) -> ArrayVec<Point, 4> {
        let mut result = ArrayVec::new();
        if x > 0 {
            result.push((x - 1, y));
        }
        if x + 1 < self.size {
            result.push((x + 1, y));
        }
        if y > 0 {
            result.push((x, y - 1));
        }
        if y + 1 < self.size {
            result.push((x, y + 1));
        }
        result
    }

    /// Flood-fill the group of same-coloured stones containing `point`.
    pub fn group(&self, point: Point) -> Vec<Point> {
        let colour = self.get(point);
        if !colour.is_stone() {
            return Vec::new();
        }

        let mut visited = vec![false; self.cells.len()];
        let mut result = Vec::new();
        let mut stack = vec![point];

        while let Some(p) = stack.pop() {
            let vi = self.idx(p);
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            result.push(p);
            for n in self.neighbours(p) {
                if self.get(n) == colour && !visited[self.idx(n)] {
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Whether the group at `point` touches at least one empty point.
    ///
    /// Stops at the first liberty found. Panics if `point` holds no stone.
    pub fn group_has_liberties(&self, point: Point) -> bool {
        let colour = self.get(point);
        assert!(colour.is_stone(), "liberty search from an empty point");

        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![point];

        while let Some(p) = stack.pop() {
            let vi = self.idx(p);
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            for n in self.neighbours(p) {
                match self.get(n) {
                    Colour::Empty => return true,
                    c if c == colour && !visited[self.idx(n)] => stack.push(n),
                    _ => {}
                }
            }
        }

        false
    }

    // -- Mutation, only used while a node's board is being derived --

    fn set(&mut self, point: Point, colour: Colour) {
        let i = self.idx(point);
        self.cells[i] = colour;
    }

    /// Place a stone and resolve captures. No legality checks: a stone left
    /// without liberties after the opponent's captures is removed again.
    fn play(&mut self, colour: Colour, point: Point) {
        assert!(colour.is_stone(), "cannot play an empty stone");
        assert!(self.on_board(point), "move {point:?} is off the board");

        self.set(point, colour);

        let opponent = colour.opposite();
        for n in self.neighbours(point) {
            if self.get(n) == opponent && !self.group_has_liberties(n) {
                self.destroy_group(n);
            }
        }

        if !self.group_has_liberties(point) {
            self.destroy_group(point);
        }
    }

    /// Remove the whole group at `point`.
    fn destroy_group(&mut self, point: Point) {
        for p in self.group(point) {
            self.set(p, Colour::Empty);
        }
    }

    #[inline]
    fn idx(&self, (x, y): Point) -> usize {
        y as usize * self.size as usize + x as usize
    }
}

/// Text diagram, one row per line: `X` black, `O` white, `.` empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get((x, y)) {
                    Colour::Black => 'X',
                    Colour::White => 'O',
                    Colour::Empty => '.',
                };
                write!(f, "{ch}")?;
                if x + 1 < self.size {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Test helper: build a board from an ASCII layout, one string per row.
    /// 'B' = Black, 'W' = White, anything else = Empty.
    pub(crate) fn board_from_layout(layout: &[&str]) -> Board {
        let size = layout.len() as u8;
        let mut board = Board::new(size);
        for (y, row) in layout.iter().enumerate() {
            assert_eq!(row.len(), layout.len(), "layout must be square");
            for (x, ch) in row.chars().enumerate() {
                let colour = match ch {
                    'B' => Colour::Black,
                    'W' => Colour::White,
                    _ => Colour::Empty,
                };
                board.set((x as u8, y as u8), colour);
            }
        }
        board
    }

    #[test]
    fn creates_empty_board() {
        let board = Board::new(9);
        assert!(board.is_empty());
        assert_eq!(board.cells().len(), 81);
        assert_eq!(board.size(), 9);
    }

    #[test]
    fn off_board_reads_empty() {
        let board = board_from_layout(&["BB", "BB"]);
        assert_eq!(board.get((1, 1)), Colour::Black);
        assert_eq!(board.get((2, 0)), Colour::Empty);
        assert!(!board.on_board((0, 2)));
    }

    #[test]
    fn neighbours_at_edges() {
        let board = Board::new(3);
        assert_eq!(board.neighbours((0, 0)).len(), 2);
        assert_eq!(board.neighbours((1, 0)).len(), 3);
        assert_eq!(board.neighbours((1, 1)).len(), 4);
    }

    #[test]
    fn group_follows_orthogonal_links_only() {
        let board = board_from_layout(&["BB+", "+B+", "++B"]);
        let mut group = board.group((0, 0));
        group.sort();
        assert_eq!(group, vec![(0, 0), (1, 0), (1, 1)]);
        assert!(board.group((2, 0)).is_empty());
    }

    #[test]
    fn liberties_of_group() {
        let board = board_from_layout(&["BW+", "+++", "+++"]);
        assert!(board.group_has_liberties((0, 0)));
        assert!(board.group_has_liberties((1, 0)));
    }

    #[test]
    fn surrounded_group_has_no_liberties() {
        let board = board_from_layout(&["BW+", "W++", "+++"]);
        assert!(!board.group_has_liberties((0, 0)));
        assert!(board.group_has_liberties((1, 0)));
    }

    #[test]
    #[should_panic(expected = "empty point")]
    fn liberty_search_needs_a_stone() {
        Board::new(3).group_has_liberties((0, 0));
    }

    #[test]
    fn captures_single_stone() {
        let mut board = board_from_layout(&["+B++", "BWB+", "++++", "++++"]);
        board.play(Colour::Black, (1, 2));
        assert_eq!(board.get((1, 1)), Colour::Empty);
        assert_eq!(board.count(Colour::Black), 4);
    }

    #[test]
    fn captures_bent_group() {
        let mut board = board_from_layout(&[
            "+BB++", "BWWB+", "BW+B+", "BWWB+", "+BB++",
        ]);
        board.play(Colour::Black, (2, 2));
        assert_eq!(board.count(Colour::White), 0);
        assert_eq!(board.get((2, 2)), Colour::Black);
    }

    #[test]
    fn captures_ring_group() {
        // White ring around an empty eye at (2,2), black filling the eye last.
        let mut board = board_from_layout(&[
            "+BBB+", "BWWWB", "BW+WB", "BWWWB", "+BBB+",
        ]);
        board.play(Colour::Black, (2, 2));
        assert_eq!(board.count(Colour::White), 0);
        assert_eq!(board.get((2, 2)), Colour::Black);
    }

    #[test]
    fn captures_corner_stone() {
        let mut board = board_from_layout(&["B+++", "W+++", "++++", "++++"]);
        board.play(Colour::White, (1, 0));
        assert_eq!(board.get((0, 0)), Colour::Empty);
    }

    #[test]
    fn capture_takes_priority_over_self_capture() {
        // Black fills the last liberty of both groups: white dies, black lives.
        let mut board = board_from_layout(&["+WB", "WB+", "B++"]);
        board.play(Colour::Black, (0, 0));
        assert_eq!(board.get((0, 0)), Colour::Black);
        assert_eq!(board.get((1, 0)), Colour::Empty);
        assert_eq!(board.get((0, 1)), Colour::Empty);
    }

    #[test]
    fn suicide_removes_own_group() {
        let mut board = board_from_layout(&["+B+", "B++", "+++"]);
        board.play(Colour::White, (0, 0));
        assert_eq!(board.get((0, 0)), Colour::Empty);
        assert_eq!(board.count(Colour::Black), 2);
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn play_off_board_panics() {
        Board::new(3).play(Colour::Black, (3, 0));
    }

    #[test]
    #[should_panic(expected = "empty stone")]
    fn play_empty_colour_panics() {
        Board::new(3).play(Colour::Empty, (0, 0));
    }

    #[test]
    fn derive_applies_setup_then_moves() {
        let parent = board_from_layout(&["+++", "+++", "+++"]);
        let props = Properties::from_pairs([
            ("AB", "ba"),
            ("AB", "ab"),
            ("AW", "cc"),
            ("AE", "cc"),
            ("W", "aa"),
        ]);
        let board = Board::derive(Some(&parent), 3, &props);
        // White at the corner is self-captured against the black setup stones.
        assert_eq!(board.get((0, 0)), Colour::Empty);
        assert_eq!(board.get((1, 0)), Colour::Black);
        assert_eq!(board.get((0, 1)), Colour::Black);
        assert_eq!(board.get((2, 2)), Colour::Empty);
    }

    #[test]
    fn derive_skips_passes_and_off_board_values() {
        let props = Properties::from_pairs([("B", ""), ("AB", "zz"), ("W", "tt")]);
        let board = Board::derive(None, 19, &props);
        assert!(board.is_empty());
    }

    #[test]
    fn derive_does_not_touch_parent() {
        let parent = Board::new(5);
        let props = Properties::from_pairs([("B", "cc")]);
        let child = Board::derive(Some(&parent), 5, &props);
        assert!(parent.is_empty());
        assert_eq!(child.get((2, 2)), Colour::Black);
    }

    #[test]
    fn display_diagram() {
        let board = board_from_layout(&["B+", "+W"]);
        assert_eq!(board.to_string(), "X .\n. O\n");
    }
}
