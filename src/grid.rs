use thiserror::Error;

/// Errors raised by grid construction and strict accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: usize, height: usize },
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
}

/// Moore neighborhood offsets, excluding the center.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Next state of a cell under the standard B3/S23 rule.
#[inline(always)]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Fixed-size, double-buffered Game of Life grid.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    // --- Ping-Pong Buffers ---
    // Current generation (read during step, the only buffer visible to callers)
    current: Vec<bool>,
    // Next generation (written during step, swapped in afterwards)
    next: Vec<bool>,
}

impl Grid {
    /// Creates a `width` x `height` grid with every cell dead.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimension { width, height });
        }
        // Allocations are capped at isize::MAX bytes; one byte per cell
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or(GridError::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            current: vec![false; len],
            next: vec![false; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Current-generation cells, row-major.
    pub fn cells(&self) -> &[bool] {
        &self.current
    }

    #[inline(always)]
    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), GridError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { x, y, width: self.width, height: self.height })
        }
    }

    /// Returns the state of cell (x, y).
    pub fn get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.current[self.index(x, y)])
    }

    /// Sets cell (x, y). Writes outside the grid are dropped.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.current[idx] = alive;
        }
    }

    /// Flips cell (x, y). No-op outside the grid.
    pub fn toggle(&mut self, x: usize, y: usize) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.current[idx] = !self.current[idx];
        }
    }

    /// Counts live cells among the 8 neighbors of (x, y). Off-grid neighbors count as dead.
    pub fn count_live_neighbors(&self, x: usize, y: usize) -> Result<u8, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.neighbors_unchecked(x, y))
    }

    // Caller guarantees (x, y) is on the grid.
    fn neighbors_unchecked(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if self.in_bounds(nx, ny) && self.current[self.index(nx, ny)] {
                count += 1;
            }
        }
        count
    }

    /// Advances the grid by one generation.
    pub fn step(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let neighbors = self.neighbors_unchecked(x, y);
                self.next[idx] = next_state(self.current[idx], neighbors);
            }
        }

        // --- Swap Buffers: next becomes current ---
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Kills every cell in both buffers.
    pub fn reset(&mut self) {
        self.current.fill(false);
        self.next.fill(false);
    }

    /// Number of live cells in the current generation.
    pub fn population(&self) -> usize {
        self.current.iter().filter(|&&alive| alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.current.contains(&true)
    }

    /// Coordinates of every live cell, row-major.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.current
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(idx, _)| (idx % self.width, idx / self.width))
    }
}
