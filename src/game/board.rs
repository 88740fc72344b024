use std::fmt;

use super::Color;
use crate::error::MoveError;

pub const GRID_SIZE: usize = 8;
pub const NUM_CELLS: usize = GRID_SIZE * GRID_SIZE;

/// Line directions as (row step, col step): E, SE, S, SW, W, NW, N, NE.
const DIRECTIONS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

/// A Reversi position: the grid plus the color whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
    turn: Color,
}

impl Board {
    /// Standard opening position, black to move.
    pub fn initial() -> Self {
        let mut cells = [[Cell::Empty; GRID_SIZE]; GRID_SIZE];
        cells[3][3] = Cell::White;
        cells[4][4] = Cell::White;
        cells[3][4] = Cell::Black;
        cells[4][3] = Cell::Black;
        Board {
            cells,
            turn: Color::Black,
        }
    }

    /// Build an arbitrary position. No legality check is made.
    pub fn from_grid(cells: [[Cell; GRID_SIZE]; GRID_SIZE], turn: Color) -> Self {
        Board { cells, turn }
    }

    /// Get the cell at a specific position. Row 0 is the top.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn turn_color(&self) -> Color {
        self.turn
    }

    pub fn grid_size() -> usize {
        GRID_SIZE
    }

    pub fn swap_turn(&mut self) {
        self.turn = self.turn.opposite();
    }

    /// Number of cells holding `color`.
    pub fn count(&self, color: Color) -> usize {
        let cell = color.to_cell();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }

    /// Every position reachable by one legal move of the side to move, in
    /// row-major order of the placed token. Children keep the parent's side
    /// to move; whoever picks one swaps it.
    pub fn children(&self) -> Vec<Board> {
        let mut result = Vec::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.cells[row][col] != Cell::Empty {
                    continue;
                }
                let mut child = *self;
                if child.place_token(row, col) {
                    result.push(child);
                }
            }
        }
        result
    }

    /// Checked single move for externally supplied coordinates. The returned
    /// board keeps the current side to move, like [`Board::children`].
    pub fn play(&self, row: usize, col: usize) -> Result<Board, MoveError> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(MoveError::OutOfBounds { row, col });
        }
        let mut child = *self;
        if child.place_token(row, col) {
            Ok(child)
        } else {
            Err(MoveError::IllegalMove { row, col })
        }
    }

    /// Color with strictly more tokens on the board, `None` on a tie.
    pub fn winner(&self) -> Option<Color> {
        let black = self.count(Color::Black);
        let white = self.count(Color::White);
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Place the side to move's token at (row, col) and flip every captured
    /// line. Returns false and leaves the board untouched if nothing would be
    /// captured or the cell is occupied.
    fn place_token(&mut self, row: usize, col: usize) -> bool {
        if self.cells[row][col] != Cell::Empty {
            return false;
        }

        let own = self.turn.to_cell();
        let mut valid = false;
        for &(step_row, step_col) in &DIRECTIONS {
            let count = self.opponent_line_length(row, col, step_row, step_col);
            if count > 0 {
                valid = true;
                self.flip_line(row, col, step_row, step_col, count);
                self.cells[row][col] = own;
            }
        }
        valid
    }

    /// Number of consecutive opponent tokens starting next to (row, col) in
    /// the given direction and closed by one of our tokens. Zero when the run
    /// hits the edge or an empty cell.
    fn opponent_line_length(&self, row: usize, col: usize, step_row: i32, step_col: i32) -> usize {
        let own = self.turn.to_cell();
        let opponent = self.turn.opposite().to_cell();
        let mut r = row as i32 + step_row;
        let mut c = col as i32 + step_col;
        let mut count = 0;

        while in_bounds(r, c) && self.cells[r as usize][c as usize] == opponent {
            count += 1;
            r += step_row;
            c += step_col;
        }

        if in_bounds(r, c) && self.cells[r as usize][c as usize] == own {
            count
        } else {
            0
        }
    }

    fn flip_line(&mut self, row: usize, col: usize, step_row: i32, step_col: i32, count: usize) {
        let own = self.turn.to_cell();
        for i in 1..=count as i32 {
            let r = (row as i32 + i * step_row) as usize;
            let c = (col as i32 + i * step_col) as usize;
            self.cells[r][c] = own;
        }
    }
}

fn in_bounds(row: i32, col: i32) -> bool {
    row >= 0 && row < GRID_SIZE as i32 && col >= 0 && col < GRID_SIZE as i32
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2 3 4 5 6 7")?;
        for row in 0..GRID_SIZE {
            write!(f, "{row}")?;
            for col in 0..GRID_SIZE {
                let symbol = match self.cells[row][col] {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{} to move", self.turn.name())
    }
}
