/// A read-only view of the simulation at one instant, handed to renderers.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    /// Current-generation cells, row-major (`y * width + x`).
    pub cells: &'a [bool],
    pub width: usize,
    pub height: usize,
    /// Cursor position as (x, y).
    pub cursor: (usize, usize),
    /// Generations stepped since the last reset.
    pub generation: u64,
    /// Whether ticks currently advance generations.
    pub simulating: bool,
}

impl GridView<'_> {
    /// Returns the cell state, treating off-grid coordinates as dead.
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn is_cursor(&self, x: usize, y: usize) -> bool {
        self.cursor == (x, y)
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }
}
