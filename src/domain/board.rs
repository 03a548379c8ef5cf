// Board representation and the win/tie rules for a 3x3 grid.

pub const GRID_SIZE: usize = 3;

/// The symbol a participant places on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn other(self) -> Self {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }
}

/// A 3x3 grid of cells; an empty cell holds `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Marker>; GRID_SIZE]; GRID_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell contents, or `None` when the coordinates are off the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<Option<Marker>> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Writes a marker into a single cell. Callers validate bounds and vacancy first.
    pub fn place(&mut self, row: usize, col: usize, marker: Marker) {
        self.cells[row][col] = Some(marker);
    }

    /// True when any row, column, or diagonal is held entirely by `marker`.
    pub fn has_won(&self, marker: Marker) -> bool {
        let held = |row: usize, col: usize| self.cells[row][col] == Some(marker);

        (0..GRID_SIZE).any(|r| (0..GRID_SIZE).all(|c| held(r, c)))
            || (0..GRID_SIZE).any(|c| (0..GRID_SIZE).all(|r| held(r, c)))
            || (0..GRID_SIZE).all(|i| held(i, i))
            || (0..GRID_SIZE).all(|i| held(i, GRID_SIZE - 1 - i))
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_some())
    }
}
