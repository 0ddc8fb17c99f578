//! Integer grid cells and unit directions

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A tile / grid cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance
    pub fn chebyshev(&self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Unit step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const NONE: Direction = Direction { dx: 0, dy: 0 };
    pub const UP: Direction = Direction { dx: 0, dy: -1 };
    pub const DOWN: Direction = Direction { dx: 0, dy: 1 };
    pub const LEFT: Direction = Direction { dx: -1, dy: 0 };
    pub const RIGHT: Direction = Direction { dx: 1, dy: 0 };

    pub const ALL: [Direction; 4] = [Self::UP, Self::DOWN, Self::LEFT, Self::RIGHT];

    pub fn is_none(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// True if `other` points exactly the opposite way
    pub fn is_reverse_of(&self, other: Direction) -> bool {
        !self.is_none() && self.dx == -other.dx && self.dy == -other.dy
    }

    pub fn scaled(&self, n: i32) -> Direction {
        Direction {
            dx: self.dx * n,
            dy: self.dy * n,
        }
    }
}

impl Add<Direction> for Cell {
    type Output = Cell;

    fn add(self, d: Direction) -> Cell {
        Cell::new(self.x + d.dx, self.y + d.dy)
    }
}

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: i32,
    pub rows: i32,
}

impl GridSize {
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    pub fn len(&self) -> usize {
        (self.cols.max(0) * self.rows.max(0)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of a cell
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.y * self.cols + cell.x) as usize)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        let i = index as i32;
        Cell::new(i % self.cols, i / self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_detection() {
        assert!(Direction::UP.is_reverse_of(Direction::DOWN));
        assert!(Direction::LEFT.is_reverse_of(Direction::RIGHT));
        assert!(!Direction::UP.is_reverse_of(Direction::LEFT));
        assert!(!Direction::NONE.is_reverse_of(Direction::NONE));
    }

    #[test]
    fn test_grid_bounds_and_index() {
        let grid = GridSize::new(4, 3);
        assert!(grid.contains(Cell::new(3, 2)));
        assert!(!grid.contains(Cell::new(4, 0)));
        assert!(!grid.contains(Cell::new(0, -1)));
        assert_eq!(grid.index_of(Cell::new(1, 2)), Some(9));
        assert_eq!(grid.cell_at(9), Cell::new(1, 2));
        assert_eq!(grid.index_of(Cell::new(-1, 0)), None);
    }
}
