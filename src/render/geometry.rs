//! Diamond cell layout for the chamber matrices

use serde::{Deserialize, Serialize};

/// Side length of the chamber grid
pub const GRID_SIZE: usize = 11;

/// A grid position inside the diamond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiamondCell {
    pub row: usize,
    pub col: usize,
}

impl DiamondCell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Which way a chamber fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChamberOrder {
    /// Lowest rows first: sand stays at the bottom of the upper reservoir.
    Top,
    /// Highest rows first.
    Bottom,
}

/// Twice the distance of `i` from the grid centre. Doubling keeps even sizes
/// exact, where the centre falls between two cells.
#[inline]
fn doubled_offset(i: usize, size: usize) -> usize {
    (2 * i).abs_diff(size - 1)
}

/// Cells with Manhattan distance from the centre at most `mid`, row-major.
pub fn build_diamond_cells(size: usize) -> Vec<DiamondCell> {
    if size == 0 {
        return Vec::new();
    }

    let limit = size - 1;
    let mut cells = Vec::new();
    for row in 0..size {
        for col in 0..size {
            if doubled_offset(row, size) + doubled_offset(col, size) <= limit {
                cells.push(DiamondCell::new(row, col));
            }
        }
    }
    cells
}

/// Cells in lighting order for a chamber.
///
/// Ties on row go to the innermost column; the sort is stable so any
/// remaining ties keep generation order.
pub fn order_cells(cells: &[DiamondCell], size: usize, order: ChamberOrder) -> Vec<DiamondCell> {
    let mut sorted = cells.to_vec();
    sorted.sort_by(|a, b| {
        let rows = match order {
            ChamberOrder::Top => b.row.cmp(&a.row),
            ChamberOrder::Bottom => a.row.cmp(&b.row),
        };
        rows.then_with(|| doubled_offset(a.col, size).cmp(&doubled_offset(b.col, size)))
    });
    sorted
}
