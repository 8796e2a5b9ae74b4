use crate::grid::Grid;
use rand::Rng;

/// A fixed shape, stored as live-cell offsets from its top-left anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const BEACON: Pattern = Pattern {
    name: "Beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
};

/// Stamps `pattern` with its anchor at (x, y). Offsets falling off the grid are dropped.
/// Returns how many cells landed on the grid.
pub fn place_pattern(grid: &mut Grid, pattern: &Pattern, x: usize, y: usize) -> usize {
    let mut placed = 0;
    for &(dx, dy) in pattern.cells {
        let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) else {
            continue;
        };
        if cx < grid.width() && cy < grid.height() {
            placed += 1;
        }
        grid.set(cx, cy, true);
    }
    placed
}

/// Fills the `width` x `height` rectangle anchored at (x, y) with coin-flip cells.
/// Every on-grid cell in the rectangle is overwritten, alive or dead.
pub fn place_random_block<R: Rng + ?Sized>(
    grid: &mut Grid,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    rng: &mut R,
) {
    for dy in 0..height {
        for dx in 0..width {
            // One draw per rectangle cell, on-grid or not
            let alive = rng.random_bool(0.5);
            if let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) {
                grid.set(cx, cy, alive);
            }
        }
    }
}
