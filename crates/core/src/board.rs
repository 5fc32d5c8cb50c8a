//! Board module - a player's fixed-size grid
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing
//! downwards; row 0 is the top of the visible board. Cells are stored in a
//! flat row-major vector sized once at construction.

use crate::piece::Piece;
use crate::types::{Cell, BONUS_CREDIT, LINE_CREDIT, TEMPLATE_SIZE};

/// A `width` x `height` grid of cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    /// Row-major (y * width + x).
    cells: Vec<Cell>,
}

/// Outcome of scanning a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Incomplete,
    Complete,
    /// Complete and every cell shares one color.
    Bonus,
}

impl Board {
    /// Create an all-blank board.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Blank; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the board.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            panic!(
                "cell ({x}, {y}) is outside the {}x{} board",
                self.width, self.height
            );
        };
        self.cells[i] = cell;
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// One row, left to right.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not a row of this board.
    pub fn row(&self, y: usize) -> &[Cell] {
        let w = self.width as usize;
        &self.cells[y * w..(y + 1) * w]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write a piece's color into every non-blank cell of its template.
    ///
    /// The caller must have checked the position with
    /// [`is_valid`](crate::collision::is_valid) first.
    ///
    /// # Panics
    ///
    /// Panics if a target cell lies outside the board.
    pub fn place(&mut self, piece: &Piece) {
        for ly in 0..TEMPLATE_SIZE {
            for lx in 0..TEMPLATE_SIZE {
                if piece.cell(lx, ly).is_blank() {
                    continue;
                }
                let x = piece.x + lx as i32;
                let y = piece.y + ly as i32;
                self.set(x, y, Cell::Filled(piece.color));
            }
        }
    }

    /// Classify row `y`.
    pub fn row_state(&self, y: usize) -> RowState {
        let mut color = None;
        let mut monochrome = true;
        for cell in self.row(y) {
            let Cell::Filled(c) = *cell else {
                return RowState::Incomplete;
            };
            match color {
                None => color = Some(c),
                Some(first) if first != c => monochrome = false,
                Some(_) => {}
            }
        }
        if monochrome {
            RowState::Bonus
        } else {
            RowState::Complete
        }
    }

    /// Drop row `y`, pull every row above it down by one and blank row 0.
    pub fn remove_row(&mut self, y: usize) {
        let w = self.width as usize;
        for row in (1..=y).rev() {
            let src = (row - 1) * w;
            self.cells.copy_within(src..src + w, row * w);
        }
        self.cells[..w].fill(Cell::Blank);
    }

    /// Remove every completed row and return the credit earned.
    ///
    /// Rows are scanned bottom-up. After a removal the same row index is
    /// examined again, since the row pulled into it may be complete too.
    /// Each completed row earns `LINE_CREDIT`, plus `BONUS_CREDIT` when all
    /// its cells share one color.
    pub fn scan_and_clear(&mut self) -> u32 {
        let mut credit = 0;
        let mut y = self.height as i32 - 1;
        while y >= 0 {
            match self.row_state(y as usize) {
                RowState::Incomplete => y -= 1,
                state => {
                    self.remove_row(y as usize);
                    credit += LINE_CREDIT;
                    if state == RowState::Bonus {
                        credit += BONUS_CREDIT;
                    }
                    tracing::trace!(row = y, bonus = state == RowState::Bonus, "row removed");
                }
            }
        }
        credit
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Blank);
    }

    /// Build a board from text rows for tests: `.` blank, `x` poison,
    /// digits are colors.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u8;
        let width = rows.first().map_or(0, |r| r.len()) as u8;
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width as usize);
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => Cell::Blank,
                    'x' => Cell::Poison,
                    d => Cell::Filled(d.to_digit(10).expect("color digit") as u8),
                };
                board.set(x as i32, y as i32, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::BOARD_WIDTH, crate::types::BOARD_HEIGHT)
    }
}
