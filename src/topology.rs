use serde::{Deserialize, Serialize};

use crate::config::GridShape;

/// A grid coordinate. Ordered by row, then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, (dr, dc): (i32, i32)) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }
}

/// Neighbour offsets in enumeration order: stay, +row, +col, -row, -col.
/// Movement tie-breaks depend on this order.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 5] = [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)];

/// The immutable set of cells agents may occupy.
#[derive(Clone, Debug)]
pub struct GridTopology {
    height: usize,
    width: usize,
    /// Row-major, one entry per rectangle cell: index into `cells` when valid.
    lookup: Vec<Option<usize>>,
    cells: Vec<Position>,
}

impl GridTopology {
    /// Build from a row-major boolean mask of `height * width` entries.
    pub fn from_mask(height: usize, width: usize, mask: &[bool]) -> Self {
        assert_eq!(mask.len(), height * width, "mask does not match grid extent");
        let mut lookup = vec![None; height * width];
        let mut cells = Vec::new();
        for row in 0..height {
            for col in 0..width {
                let flat = row * width + col;
                if mask[flat] {
                    lookup[flat] = Some(cells.len());
                    cells.push(Position::new(row as i32, col as i32));
                }
            }
        }
        Self {
            height,
            width,
            lookup,
            cells,
        }
    }

    pub fn rectangle(height: usize, width: usize) -> Self {
        Self::from_mask(height, width, &vec![true; height * width])
    }

    /// Elliptical mask inscribed in the rectangle. Only a true circle when
    /// `height == width`.
    pub fn circle(height: usize, width: usize) -> Self {
        let half_h = height as f64 / 2.0;
        let half_w = width as f64 / 2.0;
        let limit = half_h * half_w;
        let mut mask = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                let dr = row as f64 - half_h;
                let dc = col as f64 - half_w;
                mask.push(dr * dr + dc * dc < limit);
            }
        }
        Self::from_mask(height, width, &mask)
    }

    pub fn from_shape(shape: &GridShape) -> Self {
        if shape.circular {
            Self::circle(shape.height, shape.width)
        } else {
            Self::rectangle(shape.height, shape.width)
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Valid cells in row-major order.
    pub fn valid_cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Dense index of a valid cell, `None` outside the valid set.
    #[inline]
    pub fn cell_index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (row, col) = (pos.row as usize, pos.col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        self.lookup[row * self.width + col]
    }

    #[inline]
    pub fn is_valid(&self, pos: Position) -> bool {
        self.cell_index(pos).is_some()
    }

    /// Valid neighbours of `pos` (itself included) in [`NEIGHBOUR_OFFSETS`] order.
    pub fn adjacent(&self, pos: Position) -> Vec<Position> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|&delta| pos.offset(delta))
            .filter(|&p| self.is_valid(p))
            .collect()
    }
}
