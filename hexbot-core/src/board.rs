//! Hex board: square grid of stones plus the four virtual sides

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Hex neighbour offsets as (row, col) deltas
pub const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, -1),
];

// ============================================================================
// COLORS AND SIDES
// ============================================================================

/// Stone color of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Free,
    /// Connects TOP to BOTTOM
    Red,
    /// Connects LEFT to RIGHT
    Blue,
}

impl Color {
    /// The other player. `Free` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
            Color::Free => Color::Free,
        }
    }

    /// (near, far) sides a player has to connect; searches run near -> far
    pub fn sides(self) -> Option<(Side, Side)> {
        match self {
            Color::Red => Some((Side::Bottom, Side::Top)),
            Color::Blue => Some((Side::Right, Side::Left)),
            Color::Free => None,
        }
    }

    /// Character used in canonical board keys
    pub fn key_char(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Free => '0',
        }
    }

    /// Parse a player color from its wire character
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "R" => Some(Color::Red),
            "B" => Some(Color::Blue),
            _ => None,
        }
    }
}

/// One of the four virtual nodes bounding the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// Sides are permanently owned by the player whose axis they close
    pub fn color(self) -> Color {
        match self {
            Side::Top | Side::Bottom => Color::Red,
            Side::Left | Side::Right => Color::Blue,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Bottom => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }
}

// ============================================================================
// MOVES
// ============================================================================

/// A cell coordinate, also the unit of board mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// What a player does on its turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Place(Move),
    Swap,
}

// ============================================================================
// BOARD
// ============================================================================

/// N x N grid of stones, row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Color>,
}

impl Board {
    /// Empty board. Sizes below 1 are clamped to 1.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            cells: vec![Color::Free; size * size],
        }
    }

    /// Parse rows of `R`, `B` and `0`/`.`/`_` (free). Whitespace inside a
    /// row is ignored so rendered boards parse back.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidBoard("no rows".to_string()));
        }

        let mut board = Board::new(size);
        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if chars.len() != size {
                return Err(EngineError::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    chars.len(),
                    size
                )));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                let color = match ch {
                    'R' | 'r' => Color::Red,
                    'B' | 'b' => Color::Blue,
                    '0' | '.' | '_' => Color::Free,
                    other => {
                        return Err(EngineError::InvalidBoard(format!(
                            "unknown cell '{}' at {},{}",
                            other, row, col
                        )))
                    }
                };
                board.cells[row * size + col] = color;
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size
    }

    pub fn get(&self, mv: Move) -> Color {
        self.cells[mv.row * self.size + mv.col]
    }

    pub fn is_free(&self, mv: Move) -> bool {
        self.get(mv) == Color::Free
    }

    /// Put a stone on a cell. Callers hand in in-bounds coordinates.
    pub fn place(&mut self, mv: Move, color: Color) {
        debug_assert!(self.contains(mv), "move {} outside {}x{} board", mv, self.size, self.size);
        self.cells[mv.row * self.size + mv.col] = color;
    }

    /// Copy of the board with one more stone
    pub fn with_stone(&self, mv: Move, color: Color) -> Board {
        let mut next = self.clone();
        next.place(mv, color);
        next
    }

    /// Check a move against the board before it is trusted
    pub fn validate(&self, mv: Move) -> Result<(), EngineError> {
        if !self.contains(mv) {
            return Err(EngineError::OutOfBounds {
                row: mv.row,
                col: mv.col,
                size: self.size,
            });
        }
        if !self.is_free(mv) {
            return Err(EngineError::Occupied {
                row: mv.row,
                col: mv.col,
            });
        }
        Ok(())
    }

    /// Every cell with its color, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Move, Color)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Move::new(i / size, i % size), c))
    }

    pub fn free_cells(&self) -> Vec<Move> {
        self.cells()
            .filter(|(_, c)| *c == Color::Free)
            .map(|(mv, _)| mv)
            .collect()
    }

    pub fn has_free_cell(&self) -> bool {
        self.cells.iter().any(|c| *c == Color::Free)
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Color::Free).count()
    }

    /// Canonical one-character-per-cell encoding, row-major
    pub fn key(&self) -> String {
        self.cells.iter().map(|c| c.key_char()).collect()
    }

    /// In-bounds cell at a signed offset from `mv`
    pub fn offset(&self, mv: Move, dr: isize, dc: isize) -> Option<Move> {
        let row = mv.row as isize + dr;
        let col = mv.col as isize + dc;
        if row < 0 || col < 0 || row >= self.size as isize || col >= self.size as isize {
            return None;
        }
        Some(Move::new(row as usize, col as usize))
    }
}

impl fmt::Display for Board {
    /// Rhombus layout, each row shifted one space to the right
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            write!(f, "{}", " ".repeat(row))?;
            for col in 0..self.size {
                let ch = match self.get(Move::new(row, col)) {
                    Color::Red => 'R',
                    Color::Blue => 'B',
                    Color::Free => '_',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fold an action reported by the server into the board the engine reasons
/// over. A stone on a free cell becomes the opponent's; a stone on an
/// occupied cell is the echo of the agent's own move and is ignored. A swap
/// flips the color the agent plays.
pub fn apply_opponent_update(board: &mut Board, own_color: &mut Color, action: Action) {
    match action {
        Action::Place(mv) => {
            if board.contains(mv) && board.is_free(mv) {
                board.place(mv, own_color.opponent());
            }
        }
        Action::Swap => {
            *own_color = own_color.opponent();
        }
    }
}
